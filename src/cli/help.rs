//! Command-line help system with usage examples and topic references

use crate::config::env::EnvManager;
use colored::*;

/// Help system for the CLI application
pub struct HelpSystem {
    binary: &'static str,
}

impl HelpSystem {
    /// Topics accepted by `--help-topic`
    pub const TOPICS: [&'static str; 5] = ["config", "env", "output", "quality", "examples"];

    pub fn new() -> Self {
        Self { binary: "stmon" }
    }

    /// Display the main help message with all available options
    pub fn display_main_help(&self, use_colors: bool) -> String {
        [
            self.format_header(use_colors),
            self.format_usage_section(use_colors),
            self.format_options_section(use_colors),
            self.format_examples_section(use_colors),
            self.format_footer(use_colors),
        ]
        .join("\n")
    }

    /// Display quick help for specific topics
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "config" | "configuration" => Some(self.format_configuration_help(use_colors)),
            "env" | "environment" => Some(self.format_environment_help(use_colors)),
            "output" | "formatting" => Some(self.format_output_help(use_colors)),
            "quality" | "ratings" => Some(self.format_quality_help(use_colors)),
            "examples" => Some(self.format_examples_section(use_colors)),
            _ => None,
        }
    }

    fn heading(text: &str, use_colors: bool) -> String {
        if use_colors {
            text.bright_green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, use_colors: bool) -> String {
        let title = "Speed Test Monitor";
        let subtitle = "Start a speed test run and follow its progress live";
        let version = env!("CARGO_PKG_VERSION");

        if use_colors {
            format!("{}\n{}\nVersion: {}\n", title.bright_cyan().bold(), subtitle.bright_blue(), version.green())
        } else {
            format!("{}\n{}\nVersion: {}\n", title, subtitle, version)
        }
    }

    fn format_usage_section(&self, use_colors: bool) -> String {
        let mut usage = format!("{}\n", Self::heading("USAGE:", use_colors));
        for pattern in [
            format!("{} [OPTIONS]", self.binary),
            format!("{} --url <BASE> [OPTIONS]", self.binary),
            format!("{} --help-topic <TOPIC>", self.binary),
        ] {
            if use_colors {
                usage.push_str(&format!("  {}\n", pattern.bright_white()));
            } else {
                usage.push_str(&format!("  {}\n", pattern));
            }
        }
        usage
    }

    fn format_options_section(&self, use_colors: bool) -> String {
        let options = [
            OptionHelp {
                short: None,
                long: "url",
                value: "<BASE>",
                description: "Base URL of the speed test service",
                example: Some("--url http://192.168.1.20:5000"),
            },
            OptionHelp {
                short: None,
                long: "poll-interval",
                value: "<MS>",
                description: "Delay between status polls (50-60000 ms)",
                example: Some("--poll-interval 500"),
            },
            OptionHelp {
                short: None,
                long: "settle-delay",
                value: "<MS>",
                description: "Pause before the final result message (0-10000 ms)",
                example: None,
            },
            OptionHelp {
                short: Some("t"),
                long: "timeout",
                value: "<SECS>",
                description: "Request timeout in seconds (1-300)",
                example: Some("--timeout 30"),
            },
            OptionHelp {
                short: None,
                long: "json",
                value: "",
                description: "Print the final results as JSON",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "verbose",
                value: "",
                description: "Log session progress to stderr",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "debug",
                value: "",
                description: "Log every poll and request as JSON to stderr",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "no-color",
                value: "",
                description: "Disable colored output",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "show-config",
                value: "",
                description: "Print the resolved configuration and exit",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "help-topic",
                value: "<TOPIC>",
                description: "Show help for a topic",
                example: Some("--help-topic env"),
            },
        ];

        let mut output = format!("{}\n", Self::heading("OPTIONS:", use_colors));
        for option in options {
            output.push_str(&option.format(use_colors));
            output.push('\n');
        }
        output
    }

    fn format_examples_section(&self, use_colors: bool) -> String {
        let examples = [
            ExampleHelp {
                title: "Test against a local service",
                command: "stmon",
                description: "Uses http://localhost:5000 unless SPEEDTEST_URL is set",
            },
            ExampleHelp {
                title: "Remote service with slower polling",
                command: "stmon --url https://speed.example.com --poll-interval 1000",
                description: "Poll once per second",
            },
            ExampleHelp {
                title: "Scripting",
                command: "stmon --json --no-color > result.json",
                description: "Progress is drawn on stderr so stdout carries only the JSON",
            },
            ExampleHelp {
                title: "Troubleshooting",
                command: "stmon --debug 2> session.log",
                description: "Capture structured logs of every request and status change",
            },
        ];

        let mut output = format!("{}\n", Self::heading("EXAMPLES:", use_colors));
        for example in examples {
            output.push_str(&example.format(use_colors));
            output.push('\n');
        }
        output
    }

    fn format_footer(&self, use_colors: bool) -> String {
        let mut footer = format!("{}\n", Self::heading("ADDITIONAL HELP:", use_colors));
        for (command, description) in [
            ("--help-topic config", "Configuration sources and limits"),
            ("--help-topic env", "Environment variables and .env files"),
            ("--help-topic output", "Dashboard and summary output"),
            ("--help-topic quality", "How quality ratings are assigned"),
            ("--help-topic examples", "Usage examples"),
        ] {
            if use_colors {
                footer.push_str(&format!("  {}: {}\n", command.bright_yellow(), description));
            } else {
                footer.push_str(&format!("  {}: {}\n", command, description));
            }
        }
        footer
    }

    fn format_configuration_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", Self::heading("CONFIGURATION REFERENCE:", use_colors));

        help.push_str("CONFIGURATION PRIORITY (highest to lowest):\n");
        help.push_str("1. Command-line arguments\n");
        help.push_str("2. Environment variables\n");
        help.push_str("3. .env file in the current directory\n");
        help.push_str("4. Default values\n\n");

        help.push_str("PARAMETER LIMITS:\n");
        help.push_str("- Service URL: http or https with a host\n");
        help.push_str("- Poll interval: 50-60000 ms (default 300)\n");
        help.push_str("- Settle delay: 0-10000 ms (default 500)\n");
        help.push_str("- Timeout: 1-300 seconds (default 10)\n");

        help
    }

    fn format_environment_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", Self::heading("ENVIRONMENT VARIABLES REFERENCE:", use_colors));
        help.push_str(&EnvManager::display_env_help());
        help.push_str("\nEXAMPLE .env FILE:\n");
        help.push_str(&EnvManager::create_example_env_content());
        help
    }

    fn format_output_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", Self::heading("OUTPUT REFERENCE:", use_colors));

        help.push_str("DASHBOARD:\n");
        help.push_str("- On a terminal the dashboard redraws in place: speed gauge, progress,\n");
        help.push_str("  ping/download/upload cards, server panel and a rolling chart of the\n");
        help.push_str("  last 20 throughput samples\n");
        help.push_str("- Elsewhere only status changes are printed, one per line\n\n");

        help.push_str("SUMMARY:\n");
        help.push_str("- After a completed test the final figures are printed with ratings\n");
        help.push_str("- --json prints them as a JSON document instead and moves the\n");
        help.push_str("  progress display to stderr\n\n");

        help.push_str("LOGS:\n");
        help.push_str("- All log output goes to stderr; --verbose and --debug raise the level\n");

        help
    }

    fn format_quality_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", Self::heading("QUALITY RATINGS:", use_colors));

        help.push_str("LATENCY (ping):\n");
        help.push_str("- Below 20 ms: Excellent\n");
        help.push_str("- Below 50 ms: Good\n");
        help.push_str("- Below 100 ms: Fair\n");
        help.push_str("- Otherwise: Poor\n\n");

        help.push_str("THROUGHPUT (download and upload):\n");
        help.push_str("- Above 100 Mbps: Excellent\n");
        help.push_str("- Above 50 Mbps: Good\n");
        help.push_str("- Above 25 Mbps: Fair\n");
        help.push_str("- Above 10 Mbps: Slow\n");
        help.push_str("- Otherwise: Very Slow\n");

        help
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for formatting individual options
struct OptionHelp {
    short: Option<&'static str>,
    long: &'static str,
    value: &'static str,
    description: &'static str,
    example: Option<&'static str>,
}

impl OptionHelp {
    fn format(&self, use_colors: bool) -> String {
        let mut option_str = match self.short {
            Some(short) if use_colors => format!("  {}, ", format!("-{}", short).bright_cyan()),
            Some(short) => format!("  -{}, ", short),
            None => "      ".to_string(),
        };

        let long_with_value = if self.value.is_empty() {
            format!("--{}", self.long)
        } else {
            format!("--{} {}", self.long, self.value)
        };

        if use_colors {
            option_str.push_str(&format!("{:<30} {}", long_with_value.bright_cyan(), self.description));
        } else {
            option_str.push_str(&format!("{:<30} {}", long_with_value, self.description));
        }

        if let Some(example) = self.example {
            let example = format!("Example: {}", example);
            if use_colors {
                option_str.push_str(&format!("\n{}{}", " ".repeat(37), example.bright_blue().italic()));
            } else {
                option_str.push_str(&format!("\n{}{}", " ".repeat(37), example));
            }
        }

        option_str
    }
}

/// Helper struct for formatting examples
struct ExampleHelp {
    title: &'static str,
    command: &'static str,
    description: &'static str,
}

impl ExampleHelp {
    fn format(&self, use_colors: bool) -> String {
        if use_colors {
            format!("  {}:\n    {}\n    {}\n",
                self.title.bright_yellow().bold(),
                self.command.bright_white(),
                self.description.bright_blue().italic())
        } else {
            format!("  {}:\n    {}\n    {}\n", self.title, self.command, self.description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_help_display() {
        let help = HelpSystem::new().display_main_help(false);

        assert!(help.contains("Speed Test Monitor"));
        assert!(help.contains("USAGE:"));
        assert!(help.contains("OPTIONS:"));
        assert!(help.contains("EXAMPLES:"));
        assert!(help.contains("--poll-interval <MS>"));
        assert!(help.contains("-t, --timeout <SECS>"));
    }

    #[test]
    fn test_every_topic_has_content() {
        let help_system = HelpSystem::new();
        for topic in HelpSystem::TOPICS {
            let help = help_system.display_topic_help(topic, false);
            assert!(help.is_some_and(|h| !h.is_empty()), "topic {}", topic);
        }
        assert!(help_system.display_topic_help("dns", false).is_none());
    }

    #[test]
    fn test_environment_help_lists_variables() {
        let help = HelpSystem::new().display_topic_help("env", false).unwrap();
        assert!(help.contains("SPEEDTEST_URL"));
        assert!(help.contains("POLL_INTERVAL_MS"));
        assert!(help.contains("EXAMPLE .env FILE:"));
    }

    #[test]
    fn test_quality_help_matches_thresholds() {
        let help = HelpSystem::new().display_topic_help("quality", false).unwrap();
        assert!(help.contains("Below 20 ms: Excellent"));
        assert!(help.contains("Above 10 Mbps: Slow"));
    }

    #[test]
    fn test_option_help_formatting() {
        let option = OptionHelp {
            short: Some("t"),
            long: "timeout",
            value: "<SECS>",
            description: "Request timeout",
            example: Some("--timeout 5"),
        };
        let text = option.format(false);
        assert!(text.starts_with("  -t, --timeout <SECS>"));
        assert!(text.contains("Example: --timeout 5"));
    }
}
