//! Errors for this library

/// All the known errors returned by this crate.
#[derive(Debug, snafu::Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum ParticleFieldError {
    /// The canvas must have a positive, finite width and height.
    #[snafu(display("Invalid canvas bounds: {width}x{height}"))]
    InvalidBounds {
        /// The rejected width
        width: f64,
        /// The rejected height
        height: f64,
    },

    /// A simulation setting is outside the range it can work with.
    #[snafu(display("Invalid config: `{field}` can't be {value}"))]
    InvalidConfig {
        /// The name of the setting
        field: &'static str,
        /// The rejected value
        value: f64,
    },

    /// A force-field mode was named that doesn't exist.
    #[snafu(display("Unknown mode '{name}', expected one of: {expected}"))]
    UnknownMode {
        /// The name that couldn't be parsed
        name: String,
        /// All the valid mode names, comma-separated
        expected: String,
    },
}
