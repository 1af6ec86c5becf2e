//! Contract intake, retrieval, and question answering.
//!
//! [`Engine`] owns the static corpora and the session store. A contract is
//! loaded into a session with [`Engine::load_contract`]; questions against
//! it go through [`Engine::ask`], which retrieves a [`ContextBundle`],
//! builds the prompt, and calls the completion provider with a deterministic
//! fallback. Salary annexures go through [`Engine::analyze_salary`].

pub mod answer;
mod engine;
mod error;
pub mod intake;
pub mod prompt;
pub mod retrieval;

pub use answer::{Answer, DISCLAIMER, fallback_answer};
pub use engine::{Engine, LoadedContract, SalaryReport};
pub use error::{EngineError, InputRejection};
pub use intake::{Document, DocumentKind, ScanReport};
pub use prompt::build_prompt;
pub use retrieval::{ContextBuilder, ContextBundle, Provenance};
