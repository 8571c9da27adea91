pub mod discovery;
pub mod executor;
pub mod invoker;
pub mod reporter;
pub mod types;

pub use discovery::discover;
pub use executor::TestExecutor;
pub use invoker::{CompilerInvoker, ProcessInvoker};
pub use reporter::{JsonReport, TestReporter};
pub use types::{CaseOutcome, Invocation, TestCase, TestKind, TestResult, TestSummary};
