//! Console stylesheet

use owo_colors::Style;

/// One style per status symbol. `Default` is uncolored.
#[derive(Default, Clone, Copy)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    pub step: Style,
    /// Summary keys and secondary text.
    pub dim: Style,
    pub header: Style,
}

impl Styles {
    /// Stylesheet for a color-capable terminal.
    #[must_use]
    pub fn colored() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            info: Style::new().blue(),
            step: Style::new().cyan(),
            dim: Style::new().dimmed(),
            header: Style::new().bold().cyan(),
        }
    }

    /// Colored when `enabled`, plain otherwise.
    #[must_use]
    pub fn for_terminal(enabled: bool) -> Self {
        if enabled {
            Self::colored()
        } else {
            Self::default()
        }
    }
}
