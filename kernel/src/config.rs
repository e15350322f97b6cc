use std::sync::OnceLock;

/// Universe level of the motive `P` in generated eliminator types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotiveLevel {
    /// Motives land in `Sort 0`.
    Zero,
    /// Motives land in the universe the inductive itself lives in.
    #[default]
    Inductive,
}

/// Process-wide kernel defaults. Hosts that want something else pass an
/// explicit config to `Checker::with_config` / `GlobalEnv::with_config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KernelConfig {
    pub eta: bool,
    pub motive_level: MotiveLevel,
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_motive_level(val: &str) -> Option<MotiveLevel> {
    match val.trim().to_ascii_lowercase().as_str() {
        "zero" | "0" => Some(MotiveLevel::Zero),
        "inductive" => Some(MotiveLevel::Inductive),
        _ => None,
    }
}

impl KernelConfig {
    /// Defaults read once from `HOTT_KERNEL_ETA` and `HOTT_KERNEL_MOTIVE_LEVEL`.
    pub fn from_env() -> Self {
        static DEFAULT: OnceLock<KernelConfig> = OnceLock::new();
        *DEFAULT.get_or_init(|| KernelConfig {
            eta: std::env::var("HOTT_KERNEL_ETA")
                .ok()
                .and_then(|val| parse_flag(&val))
                .unwrap_or(false),
            motive_level: std::env::var("HOTT_KERNEL_MOTIVE_LEVEL")
                .ok()
                .and_then(|val| parse_motive_level(&val))
                .unwrap_or_default(),
        })
    }

    pub fn with_eta(self, eta: bool) -> Self {
        KernelConfig { eta, ..self }
    }

    pub fn with_motive_level(self, motive_level: MotiveLevel) -> Self {
        KernelConfig { motive_level, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_leniently() {
        assert_eq!(parse_flag(" Yes "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn motive_level_parses() {
        assert_eq!(parse_motive_level("zero"), Some(MotiveLevel::Zero));
        assert_eq!(parse_motive_level("Inductive"), Some(MotiveLevel::Inductive));
        assert_eq!(parse_motive_level("two"), None);
    }

    #[test]
    fn builders_override_fields() {
        let cfg = KernelConfig::default().with_eta(true).with_motive_level(MotiveLevel::Zero);
        assert!(cfg.eta);
        assert_eq!(cfg.motive_level, MotiveLevel::Zero);
    }
}
