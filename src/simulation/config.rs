//! Fight simulation configuration

use serde::{Deserialize, Serialize};

use crate::constants::FIGHT_TIME_LIMIT;
use crate::tuning::{AttackMode, COMBAT_TUNING_FILE, CombatTuning, load_or_default};

/// Local simulation settings (optional)
pub const FIGHT_SETTINGS_FILE: &str = "config/fight_settings.json";

/// Configuration for a batch of simulated fights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FightConfig {
    /// Number of fights to run
    pub fights: u32,
    /// Base RNG seed (None = random); fight i uses seed + i
    pub seed: Option<u64>,
    /// Worker threads (0 = rayon default)
    pub threads: usize,
    /// Seconds before a fight is called as a time-out
    pub duration_limit: f32,
    /// Scripted player skill, 0.0 - 1.0
    pub skill: f32,
    /// Overrides the attack mode from the tuning file
    pub attack_mode: Option<AttackMode>,
    /// Tuning file (None = config/combat_tuning.json)
    pub tuning_file: Option<String>,
    /// Output file path (None = timestamped file)
    pub output_file: Option<String>,
    /// Suppress progress output
    pub quiet: bool,
    /// Echo every combat event at debug level
    pub verbose: bool,
}

impl Default for FightConfig {
    fn default() -> Self {
        Self {
            fights: 1,
            seed: None,
            threads: 0,
            duration_limit: FIGHT_TIME_LIMIT,
            skill: 0.6,
            attack_mode: None,
            tuning_file: None,
            output_file: None,
            quiet: false,
            verbose: false,
        }
    }
}

/// Parse `instant` or `held:<seconds>`
pub fn parse_attack_mode(text: &str) -> Result<AttackMode, String> {
    let text = text.trim().to_lowercase();
    if text == "instant" {
        return Ok(AttackMode::Instant);
    }
    if let Some(duration) = text.strip_prefix("held:") {
        let duration: f32 = duration
            .parse()
            .map_err(|e| format!("Bad hold duration '{}': {}", duration, e))?;
        return Ok(AttackMode::Held { duration });
    }
    if text == "held" {
        return Ok(AttackMode::Held {
            duration: crate::constants::ATTACK_HOLD_DURATION,
        });
    }
    Err(format!("Unknown attack mode '{}' (expected instant or held:<secs>)", text))
}

impl FightConfig {
    /// Load configuration from a JSON settings file
    pub fn from_file(path: &str) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
    }

    /// Parse configuration from command line arguments
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_arg_list(&args)
    }

    /// Settings file (if any) first, then flag overrides.
    /// `args[0]` is the program name.
    pub fn from_arg_list(args: &[String]) -> Self {
        let settings = args
            .iter()
            .position(|a| a == "--settings")
            .and_then(|i| args.get(i + 1))
            .map(String::as_str);

        let mut config = match settings {
            Some(path) => Self::from_file(path).unwrap_or_else(|e| {
                eprintln!("Warning: {}", e);
                Self::default()
            }),
            None => Self::from_file(FIGHT_SETTINGS_FILE).unwrap_or_default(),
        };

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1);
            match (args[i].as_str(), value) {
                ("--settings", Some(_)) => i += 1,
                ("--seed", Some(v)) => {
                    config.seed = v.parse().ok();
                    i += 1;
                }
                ("--fights", Some(v)) => {
                    config.fights = v.parse().unwrap_or(1).max(1);
                    i += 1;
                }
                ("--threads", Some(v)) => {
                    config.threads = v.parse().unwrap_or(0);
                    i += 1;
                }
                ("--duration", Some(v)) => {
                    config.duration_limit = v.parse().unwrap_or(FIGHT_TIME_LIMIT);
                    i += 1;
                }
                ("--skill", Some(v)) => {
                    config.skill = v.parse::<f32>().unwrap_or(config.skill).clamp(0.0, 1.0);
                    i += 1;
                }
                ("--attack-mode", Some(v)) => {
                    match parse_attack_mode(v) {
                        Ok(mode) => config.attack_mode = Some(mode),
                        Err(e) => eprintln!("Warning: {}", e),
                    }
                    i += 1;
                }
                ("--tuning", Some(v)) => {
                    config.tuning_file = Some(v.clone());
                    i += 1;
                }
                ("--output", Some(v)) => {
                    config.output_file = Some(v.clone());
                    i += 1;
                }
                ("--quiet" | "-q", _) => config.quiet = true,
                ("--verbose" | "-v", _) => config.verbose = true,
                ("--help" | "-h", _) => {
                    print_help();
                    std::process::exit(0);
                }
                (other, _) => eprintln!("Warning: ignoring argument '{}'", other),
            }
            i += 1;
        }

        config
    }

    /// Tuning for every fight in the batch, with the attack-mode override applied
    pub fn load_tuning(&self) -> CombatTuning {
        let path = self.tuning_file.as_deref().unwrap_or(COMBAT_TUNING_FILE);
        let mut tuning = load_or_default(path);
        if let Some(mode) = self.attack_mode {
            tuning.boss.attack_mode = mode;
        }
        tuning
    }
}

fn print_help() {
    println!(
        "Boss fight simulator

Usage: simulate [OPTIONS]

Options:
  --settings <file>     Load settings JSON (default: {})
  --seed <n>            Base RNG seed
  --fights <n>          Number of fights (default: 1)
  --threads <n>         Worker threads (0 = auto)
  --duration <secs>     Time limit per fight (default: {})
  --skill <0-1>         Scripted player skill
  --attack-mode <mode>  instant | held:<secs>
  --tuning <file>       Combat tuning JSON (default: {})
  --output <file>       Results JSON path
  -q, --quiet           Suppress progress output
  -v, --verbose         Log every combat event",
        FIGHT_SETTINGS_FILE, FIGHT_TIME_LIMIT, COMBAT_TUNING_FILE
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("simulate")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = FightConfig::from_arg_list(&args(&[
            "--seed", "42", "--fights", "8", "--skill", "0.9", "--quiet",
        ]));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.fights, 8);
        assert_eq!(config.skill, 0.9);
        assert!(config.quiet);
    }

    #[test]
    fn test_skill_is_clamped() {
        let config = FightConfig::from_arg_list(&args(&["--skill", "3"]));
        assert_eq!(config.skill, 1.0);
    }

    #[test]
    fn test_attack_mode_flag() {
        let config = FightConfig::from_arg_list(&args(&["--attack-mode", "held:0.8"]));
        assert_eq!(config.attack_mode, Some(AttackMode::Held { duration: 0.8 }));
        assert_eq!(config.load_tuning().boss.attack_mode, AttackMode::Held { duration: 0.8 });
    }

    #[test]
    fn test_parse_attack_mode() {
        assert_eq!(parse_attack_mode("Instant"), Ok(AttackMode::Instant));
        assert!(matches!(parse_attack_mode("held"), Ok(AttackMode::Held { .. })));
        assert!(parse_attack_mode("held:abc").is_err());
        assert!(parse_attack_mode("charge").is_err());
    }

    #[test]
    fn test_partial_settings_json() {
        let config: FightConfig = serde_json::from_str(r#"{ "fights": 20 }"#).unwrap();
        assert_eq!(config.fights, 20);
        assert_eq!(config.duration_limit, FIGHT_TIME_LIMIT);
    }
}
