/// Directory holding one subdirectory per function, relative to the working directory
pub const DEFAULT_FUNCTIONS_ROOT: &str = "functions";

/// Compiler program invoked for every build
pub const DEFAULT_COMPILER: &str = "go";

/// File name the compiler writes inside the function directory
pub const ARTIFACT_NAME: &str = "bootstrap";

/// Single source file compiled for each function
pub const ENTRY_POINT: &str = "main.go";

/// Build tag selecting the reduced-RPC Lambda runtime integration
pub const NORPC_BUILD_TAG: &str = "lambda.norpc";
