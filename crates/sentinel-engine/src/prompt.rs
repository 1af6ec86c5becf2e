//! The explainer prompt sent to the completion provider.

use sentinel_core::text::sanitize;

use crate::retrieval::ContextBundle;

/// Fixed-shape prompt. Every section is present even when retrieval found
/// nothing, since the bundle carries sentinel text for empty blocks.
pub fn build_prompt(question: &str, bundle: &ContextBundle) -> String {
    let question = sanitize(question);
    let prompt = format!(
        "You explain Indian employment and service contracts in plain language to people \
with no legal background. Answer using only the context below.

### CONTRACT CONTEXT
{contract}

### RELEVANT INDIAN LAW
{statutes}

### REFERENCE CLAUSES
{references}

### RISKY CLAUSES
{risky}

### QUESTION
{question}

### INSTRUCTIONS
1. Find the part of the contract that answers the question.
2. Explain what it means for the reader in practical terms. Do not recite the clause.
3. Keep the answer to two or three sentences unless the question needs more.
4. Paraphrase instead of quoting the contract.
5. For a yes/no question, start with \"Yes\" or \"No\".
6. If the context does not answer the question, say so plainly.

ANSWER:
",
        contract = bundle.contract_text,
        statutes = bundle.statute_text,
        references = bundle.reference_text,
        risky = bundle.risky_summary,
    );
    sanitize(&prompt)
}
