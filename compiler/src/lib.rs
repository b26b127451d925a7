//! # arouter-compiler
//!
//! Build-time code generation for the ARouter navigation runtime.
//!
//! Given a [`SymbolSource`](arouter_symbols::SymbolSource) of annotated
//! declarations, one round of the [`Pipeline`]:
//!
//! - **Routes** - classifies route targets, validates paths and groups them
//!   into a root table, one table per group and a provider table
//! - **Interceptors** - builds the priority-ordered hook table of the module
//! - **Autowired** - compiles field directives into injector units
//!
//! Units are described structurally ([`GeneratedUnit`]) and rendered by a
//! [`Backend`] (Kotlin by default, Java available) into a [`CodeSink`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use arouter_compiler::{BuildState, CompilerOptions, MemorySink, Pipeline};
//!
//! let pipeline = Pipeline::new(CompilerOptions::default().with_module_name("app"));
//! let mut sink = MemorySink::new();
//! let outcome = pipeline.run_round(BuildState::default(), &table, &mut sink);
//! for name in outcome.deferred() {
//!     println!("retry {}", name);
//! }
//! ```

pub mod capability;
pub mod contracts;
pub mod diagnostics;
pub mod docs;
pub mod emit;
pub mod error;
pub mod extract;
pub mod inject;
pub mod ir;
pub mod java;
pub mod kotlin;
pub mod model;
pub mod options;
pub mod processor;
pub mod registry;
pub mod render;
pub mod sink;
pub mod units;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use emit::{EmitReport, Emitter};
pub use error::{CompileError, Result};
pub use ir::{InjectorPlan, Statement};
pub use java::JavaBackend;
pub use kotlin::KotlinBackend;
pub use model::{FieldDirective, HookRecord, RouteKind, RouteRecord, ValueKind};
pub use options::CompilerOptions;
pub use processor::{
    AutowiredProcessor, BuildState, InterceptorProcessor, Pipeline, ProcessorReport,
    RoundOutcome, RouteProcessor,
};
pub use registry::{HookAccumulator, RouteAccumulator};
pub use render::{Backend, RenderedUnit};
pub use sink::{CodeSink, FileSink, MemorySink, WriteOnceSink, WriteStatus};
pub use units::{GeneratedUnit, UnitBody, UnitKey};

/// Backend by CLI/config name.
pub fn backend_by_name(name: &str) -> Option<Box<dyn Backend>> {
    match name {
        "kotlin" | "kt" => Some(Box::new(KotlinBackend)),
        "java" => Some(Box::new(JavaBackend)),
        _ => None,
    }
}
