use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub heading: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub idx: fn(&str) -> String,
    pub username: fn(&str) -> String,
    pub address: fn(&str) -> String,
    pub count: fn(&str) -> String,
    pub stat: fn(&str) -> String,
    pub bar_filled: fn(&str) -> String,
    pub bar_empty: fn(&str) -> String,
    pub note: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "base" | "" => Self::base(),
            "mono" => Self::mono(),
            "canvas" => Self::canvas(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::base() // Fallback to default
            }
        }
    }

    fn base() -> Self {
        Self {
            title: |s| s.bright_blue().bold().underline().to_string(),
            heading: |s| s.bright_white().bold().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.bright_white().to_string(),
            username: |s| s.bright_magenta().bold().to_string(),
            address: |s| s.bright_black().to_string(),
            count: |s| s.yellow().bold().to_string(),
            stat: |s| s.cyan().to_string(),
            bar_filled: |s| s.bright_green().to_string(),
            bar_empty: |s| s.bright_black().dimmed().to_string(),
            note: |s| s.bright_white().dimmed().italic().to_string(),
        }
    }

    fn mono() -> Self {
        Self {
            title: |s| s.bold().underline().to_string(),
            heading: |s| s.bold().to_string(),
            line: |s| s.dimmed().to_string(),
            idx: |s| s.normal().to_string(),
            username: |s| s.bold().to_string(),
            address: |s| s.dimmed().to_string(),
            count: |s| s.bold().to_string(),
            stat: |s| s.normal().to_string(),
            bar_filled: |s| s.normal().to_string(),
            bar_empty: |s| s.dimmed().to_string(),
            note: |s| s.dimmed().italic().to_string(),
        }
    }

    fn canvas() -> Self {
        Self {
            title: |s| s.blue().bold().underline().to_string(),
            heading: |s| s.bright_cyan().bold().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.cyan().to_string(),
            username: |s| s.green().bold().to_string(),
            address: |s| s.bright_black().italic().to_string(),
            count: |s| s.red().bold().to_string(),
            stat: |s| s.magenta().to_string(),
            bar_filled: |s| s.green().to_string(),
            bar_empty: |s| s.bright_black().to_string(),
            note: |s| s.bright_black().italic().to_string(),
        }
    }
}
