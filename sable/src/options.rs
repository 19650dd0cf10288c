//! Options for controlling compiler behavior.

/// Name of the runtime support library referenced by generated assemblies when the user does
/// not choose one explicitly.
pub const DEFAULT_RUNTIME_LIBRARY: &str = "Sable.Runtime";

#[derive(Clone, Copy, Debug)]
pub struct AnalyzerOptions {
    /// Do not load the prelude. Only the universal root type `Any` is predefined then.
    pub no_prelude: bool,
}

impl AnalyzerOptions {
    pub fn default() -> AnalyzerOptions {
        AnalyzerOptions { no_prelude: false }
    }
}

/// Options forwarded to the code generator.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Reference to the managed runtime library the generated code links against.
    pub runtime_library: String,

    /// Name of the produced assembly.
    pub output_name: String,
}

impl BuildOptions {
    pub fn new(runtime_library: impl Into<String>, output_name: impl Into<String>) -> BuildOptions {
        BuildOptions {
            runtime_library: runtime_library.into(),
            output_name: output_name.into(),
        }
    }

    pub fn default() -> BuildOptions {
        BuildOptions::new(DEFAULT_RUNTIME_LIBRARY, "main")
    }
}
