use thiserror::Error;

/// Every build-time failure the processors can report.
///
/// Most variants are per-declaration: the offending element is dropped and
/// the round continues. [`CompileError::is_fatal`] marks the ones that abort
/// the owning processor's output for the round.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("The @Route is marked on unsupported class, look at [{target}].")]
    UnsupportedRouteTarget { target: String },

    #[error("Route path [{path}] of [{target}] must not be empty and must start with '/'")]
    InvalidPath { path: String, target: String },

    #[error("Failed to extract default group from path [{path}] of [{target}]")]
    GroupDerivationFailure { path: String, target: String },

    #[error("Group [{group}] of path [{path}] in [{target}] is not usable in a class name, only [0-9A-Za-z_] is allowed")]
    InvalidGroup {
        group: String,
        path: String,
        target: String,
    },

    #[error("Autowired field can't be private! please check field [{field}] in class [{owner}]")]
    InaccessibleField { field: String, owner: String },

    #[error("The field [{field}] need autowired from intent, its parent [{owner}] must be activity or fragment!")]
    IllegalTarget { field: String, owner: String },

    #[error("More than one interceptors use same priority [{priority}] : {existing} & {rejected}")]
    DuplicatePriority {
        priority: i32,
        existing: String,
        rejected: String,
    },

    #[error("Path [{path}] in group [{group}] is declared by both {existing} and {rejected}")]
    DuplicatePath {
        group: String,
        path: String,
        existing: String,
        rejected: String,
    },

    #[error("A interceptor verify failed, its {target}")]
    NotAnInterceptor { target: String },

    #[error("No module name, for more information, look at gradle log.")]
    MissingModuleName,

    #[error("Unit [{key}] was already emitted with different content")]
    UnitAlreadyEmitted { key: String },

    #[error("Failed to render [{key}]: {message}")]
    Render { key: String, message: String },

    #[error("Failed to write [{key}]: {message}")]
    Sink { key: String, message: String },
}

impl CompileError {
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CompileError::InaccessibleField { .. }
                | CompileError::DuplicatePriority { .. }
                | CompileError::MissingModuleName
        )
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
