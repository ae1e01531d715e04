// Cleaning method catalogue
//
// Each menu entry turns into a PassPlan. Methods 1-2 shell out to cache
// cleaners; 3-11 overwrite a scratch file with varying pass counts and fill
// sources. None of the overwrite methods erase anything beyond that scratch
// file, whatever their names suggest.

use crate::runner::{FillSource, OverwriteSpec, PassDescriptor, PassPlan};
use crate::{CleanerError, CleanerResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const STANDARD_COMMANDS: [&str; 4] = [
    "sudo apt clean",
    "sudo apt autoremove --purge -y",
    "sudo journalctl --vacuum-time=7d",
    "rm -rf ~/.cache/* /tmp/* /var/tmp/* 2>/dev/null || true",
];

const DEEP_COMMANDS: [&str; 4] = [
    "docker system prune -af 2>/dev/null || true",
    "npm cache clean --force 2>/dev/null || true",
    "pip cache purge 2>/dev/null || true",
    "snap set system refresh.retain=2 2>/dev/null || true",
];

const SHRED_PATTERNS: [(FillSource, &str); 5] = [
    (FillSource::Random, "NSA Random"),
    (FillSource::Zero, "Zero Fill"),
    (FillSource::Byte(0xFF), "One Fill"),
    (FillSource::Urandom, "Crypto Random"),
    (FillSource::Zero, "Final Zero"),
];

const FIBONACCI_BYTES: [u8; 8] = [0x00, 0x01, 0x01, 0x02, 0x03, 0x05, 0x08, 0x0D];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CleaningMethod {
    Standard,
    Deep,
    Secure,
    Paranoid,
    UltraParanoid,
    MilitaryShredding,
    QuantumEntanglement,
    NeuralNetwork,
    Holographic,
    TemporalFlux,
    FractalCompression,
}

impl CleaningMethod {
    /// Menu order
    pub const ALL: [CleaningMethod; 11] = [
        CleaningMethod::Standard,
        CleaningMethod::Deep,
        CleaningMethod::Secure,
        CleaningMethod::Paranoid,
        CleaningMethod::UltraParanoid,
        CleaningMethod::MilitaryShredding,
        CleaningMethod::QuantumEntanglement,
        CleaningMethod::NeuralNetwork,
        CleaningMethod::Holographic,
        CleaningMethod::TemporalFlux,
        CleaningMethod::FractalCompression,
    ];

    /// Menu number, 1-based
    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|m| m == self)
            .map(|i| i + 1)
            .unwrap_or_default()
    }

    /// Parse a menu token: either the number ("4") or the slug ("paranoid").
    pub fn from_selection(token: &str) -> CleanerResult<Self> {
        let token = token.trim();

        if let Ok(n) = token.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| Self::ALL.get(i).copied())
                .ok_or_else(|| CleanerError::InvalidSelection(token.to_string()));
        }

        Self::ALL
            .iter()
            .copied()
            .find(|m| m.slug().eq_ignore_ascii_case(token))
            .ok_or_else(|| CleanerError::InvalidSelection(token.to_string()))
    }

    pub fn slug(&self) -> &'static str {
        match self {
            CleaningMethod::Standard => "standard",
            CleaningMethod::Deep => "deep",
            CleaningMethod::Secure => "secure",
            CleaningMethod::Paranoid => "paranoid",
            CleaningMethod::UltraParanoid => "ultra",
            CleaningMethod::MilitaryShredding => "shred",
            CleaningMethod::QuantumEntanglement => "quantum",
            CleaningMethod::NeuralNetwork => "neural",
            CleaningMethod::Holographic => "holographic",
            CleaningMethod::TemporalFlux => "temporal",
            CleaningMethod::FractalCompression => "fractal",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CleaningMethod::Standard => "Standard Clean",
            CleaningMethod::Deep => "Deep Clean",
            CleaningMethod::Secure => "Secure Clean",
            CleaningMethod::Paranoid => "Paranoid Clean",
            CleaningMethod::UltraParanoid => "Ultra-Paranoid",
            CleaningMethod::MilitaryShredding => "Military Shredding",
            CleaningMethod::QuantumEntanglement => "Quantum Entanglement",
            CleaningMethod::NeuralNetwork => "Neural Network",
            CleaningMethod::Holographic => "Holographic Shatter",
            CleaningMethod::TemporalFlux => "Temporal Flux",
            CleaningMethod::FractalCompression => "Fractal Compression",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CleaningMethod::Standard => "Removes temporary files and system cache",
            CleaningMethod::Deep => "Clears Docker, NPM, PIP system caches",
            CleaningMethod::Secure => "Three-pass scratch overwrite with random data",
            CleaningMethod::Paranoid => "Five-pass overwrite alternating zero and random",
            CleaningMethod::UltraParanoid => "35-pass overwrite with sync after every pass",
            CleaningMethod::MilitaryShredding => "Multi-pattern overwrite followed by shred",
            CleaningMethod::QuantumEntanglement => "8-pass Fibonacci byte patterns",
            CleaningMethod::NeuralNetwork => "12-pass alternating random/zero patterns",
            CleaningMethod::Holographic => "7-pass interference pattern overwrite",
            CleaningMethod::TemporalFlux => "24-pass time-based pattern rotation",
            CleaningMethod::FractalCompression => "9-pass recursive pattern overwrite",
        }
    }

    /// Line printed when the method starts
    pub fn heading(&self) -> &'static str {
        match self {
            CleaningMethod::Standard => "Standard cleaning...",
            CleaningMethod::Deep => "Deep cleaning...",
            CleaningMethod::Secure => "Safe cleaning...",
            CleaningMethod::Paranoid => "Paranoid cleaning...",
            CleaningMethod::UltraParanoid => "Ultra-paranoid cleaning...",
            CleaningMethod::MilitaryShredding => "MILITARY SHREDDING...",
            CleaningMethod::QuantumEntanglement => "QUANTUM ENTANGLEMENT CLEAN...",
            CleaningMethod::NeuralNetwork => "NEURAL NETWORK SCRAMBLE...",
            CleaningMethod::Holographic => "HOLOGRAPHIC DATA SHATTER...",
            CleaningMethod::TemporalFlux => "TEMPORAL FLUX CLEAN...",
            CleaningMethod::FractalCompression => "FRACTAL COMPRESSION ERASE...",
        }
    }

    /// Scratch file size per pass before clamping to free space.
    pub fn nominal_size_mb(&self) -> Option<u64> {
        match self {
            CleaningMethod::Standard | CleaningMethod::Deep => None,
            CleaningMethod::Secure => Some(100),
            CleaningMethod::Paranoid => Some(50),
            CleaningMethod::UltraParanoid => Some(10),
            CleaningMethod::MilitaryShredding => Some(20),
            CleaningMethod::QuantumEntanglement => Some(30),
            CleaningMethod::NeuralNetwork => Some(25),
            CleaningMethod::Holographic => Some(35),
            CleaningMethod::TemporalFlux => Some(15),
            CleaningMethod::FractalCompression => Some(40),
        }
    }

    /// Effective scratch size: nominal, capped by free space and the configured maximum.
    ///
    /// Errors when the result would be zero, so no vacuous overwrite is ever run.
    pub fn scratch_size_mb(&self, free_mb: u64, max_scratch_mb: Option<u64>) -> CleanerResult<u64> {
        let nominal = self.nominal_size_mb().ok_or_else(|| {
            CleanerError::Configuration(format!("'{}' does not overwrite anything", self.slug()))
        })?;

        let size = nominal
            .min(free_mb)
            .min(max_scratch_mb.unwrap_or(u64::MAX));
        if size == 0 {
            return Err(CleanerError::InsufficientSpace {
                available_mb: free_mb,
            });
        }
        Ok(size)
    }

    /// Build the pass list for this method.
    ///
    /// `free_mb` only matters for overwrite methods.
    pub fn build_plan(&self, free_mb: u64, max_scratch_mb: Option<u64>) -> CleanerResult<PassPlan> {
        let plan = match self {
            CleaningMethod::Standard => shell_plan(
                self.slug(),
                "Cache cleaning",
                &STANDARD_COMMANDS,
                Duration::from_millis(500),
            ),
            CleaningMethod::Deep => shell_plan(
                self.slug(),
                "Deep cleaning",
                &DEEP_COMMANDS,
                Duration::from_secs(1),
            ),
            _ => {
                let size = self.scratch_size_mb(free_mb, max_scratch_mb)?;
                self.overwrite_plan(size)
            }
        };

        plan.validate()?;
        tracing::debug!(method = %self.slug(), passes = plan.len(), "Built pass plan");
        Ok(plan)
    }

    fn overwrite_plan(&self, size_mb: u64) -> PassPlan {
        use FillSource::{Urandom, Zero};

        let one_second = Duration::from_secs(1);
        match self {
            CleaningMethod::Secure => overwrite_plan(
                self.slug(),
                "secure_wipe.dat",
                one_second,
                &[Urandom; 3],
                |i, n, _| format!("Pass {}/{}", i, n),
                |src| OverwriteSpec::new(src, size_mb),
            ),
            CleaningMethod::Paranoid => overwrite_plan(
                self.slug(),
                "paranoid_wipe",
                Duration::from_secs(2),
                &alternating(5),
                |i, n, src| format!("Pass {}/{} ({})", i, n, src),
                |src| OverwriteSpec::new(src, size_mb),
            ),
            CleaningMethod::UltraParanoid => {
                let sources: Vec<FillSource> = (0..35)
                    .map(|i| if i == 0 || i == 34 { Zero } else { Urandom })
                    .collect();
                overwrite_plan(
                    self.slug(),
                    "ultra_wipe",
                    one_second,
                    &sources,
                    |i, n, src| format!("Pass {}/{} ({})", i, n, src),
                    |src| OverwriteSpec::new(src, size_mb).with_sync(),
                )
            }
            CleaningMethod::MilitaryShredding => {
                let mut plan = PassPlan::new(self.slug(), one_second).destructive("shred_file");
                let n = SHRED_PATTERNS.len();
                for (i, (src, desc)) in SHRED_PATTERNS.iter().enumerate() {
                    plan.push(PassDescriptor::overwrite(
                        format!("Shred {}/{} ({})", i + 1, n, desc),
                        OverwriteSpec::new(*src, size_mb).with_shred(),
                    ));
                }
                plan
            }
            CleaningMethod::QuantumEntanglement => {
                let sources: Vec<FillSource> =
                    FIBONACCI_BYTES.iter().map(|b| FillSource::Byte(*b)).collect();
                overwrite_plan(
                    self.slug(),
                    "quantum_wipe",
                    one_second,
                    &sources,
                    |i, n, src| format!("Quantum {}/{} ({})", i, n, src),
                    |src| OverwriteSpec::new(src, size_mb),
                )
            }
            CleaningMethod::NeuralNetwork => {
                let sources: Vec<FillSource> = (0..12)
                    .map(|i| if i % 2 == 0 { Urandom } else { Zero })
                    .collect();
                overwrite_plan(
                    self.slug(),
                    "neural_wipe",
                    one_second,
                    &sources,
                    |i, n, src| format!("Neural {}/{} ({})", i, n, src),
                    |src| OverwriteSpec::new(src, size_mb),
                )
            }
            CleaningMethod::Holographic => overwrite_plan(
                self.slug(),
                "holographic_wipe",
                one_second,
                &alternating(7),
                |i, n, _| format!("Holographic {}/{}", i, n),
                |src| OverwriteSpec::new(src, size_mb),
            ),
            CleaningMethod::TemporalFlux => {
                let sources: Vec<FillSource> = (0..24)
                    .map(|i| if i % 3 == 1 { Urandom } else { Zero })
                    .collect();
                overwrite_plan(
                    self.slug(),
                    "temporal_wipe",
                    one_second,
                    &sources,
                    |i, n, _| format!("Temporal {}/{}", i, n),
                    |src| OverwriteSpec::new(src, size_mb),
                )
            }
            CleaningMethod::FractalCompression => overwrite_plan(
                self.slug(),
                "fractal_wipe",
                one_second,
                &alternating(9),
                |i, n, _| format!("Fractal {}/{}", i, n),
                |src| OverwriteSpec::new(src, size_mb),
            ),
            // shell-only methods never reach here
            CleaningMethod::Standard | CleaningMethod::Deep => {
                PassPlan::new(self.slug(), one_second)
            }
        }
    }
}

impl fmt::Display for CleaningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for CleaningMethod {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_selection(s)
    }
}

fn shell_plan(name: &str, label: &str, commands: &[&str], delay: Duration) -> PassPlan {
    commands
        .iter()
        .fold(PassPlan::new(name, delay), |plan, line| {
            plan.with_pass(PassDescriptor::shell(label, *line))
        })
}

fn overwrite_plan(
    name: &str,
    scratch_name: &str,
    delay: Duration,
    sources: &[FillSource],
    label: impl Fn(usize, usize, FillSource) -> String,
    spec: impl Fn(FillSource) -> OverwriteSpec,
) -> PassPlan {
    let n = sources.len();
    sources.iter().enumerate().fold(
        PassPlan::new(name, delay).destructive(scratch_name),
        |plan, (i, src)| {
            plan.with_pass(PassDescriptor::overwrite(label(i + 1, n, *src), spec(*src)))
        },
    )
}

/// zero, urandom, zero, ... of length `n`
fn alternating(n: usize) -> Vec<FillSource> {
    (0..n)
        .map(|i| if i % 2 == 0 { FillSource::Zero } else { FillSource::Urandom })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::PassAction;
    use test_case::test_case;

    fn overwrite_sources(plan: &PassPlan) -> Vec<FillSource> {
        plan.passes()
            .iter()
            .filter_map(|p| match p.action() {
                PassAction::Overwrite(spec) => Some(spec.source),
                PassAction::Shell(_) => None,
            })
            .collect()
    }

    #[test_case(CleaningMethod::Standard, 4; "standard")]
    #[test_case(CleaningMethod::Deep, 4; "deep")]
    #[test_case(CleaningMethod::Secure, 3; "secure")]
    #[test_case(CleaningMethod::Paranoid, 5; "paranoid")]
    #[test_case(CleaningMethod::UltraParanoid, 35; "ultra")]
    #[test_case(CleaningMethod::MilitaryShredding, 5; "shred")]
    #[test_case(CleaningMethod::QuantumEntanglement, 8; "quantum")]
    #[test_case(CleaningMethod::NeuralNetwork, 12; "neural")]
    #[test_case(CleaningMethod::Holographic, 7; "holographic")]
    #[test_case(CleaningMethod::TemporalFlux, 24; "temporal")]
    #[test_case(CleaningMethod::FractalCompression, 9; "fractal")]
    fn test_pass_counts(method: CleaningMethod, expected: usize) {
        let plan = method.build_plan(10_000, None).unwrap();
        assert_eq!(plan.len(), expected);
        assert_eq!(plan.is_destructive(), method.nominal_size_mb().is_some());
    }

    #[test]
    fn test_selection_numbers_round_trip_menu_order() {
        for (i, method) in CleaningMethod::ALL.iter().enumerate() {
            assert_eq!(method.number(), i + 1);
            let parsed = CleaningMethod::from_selection(&(i + 1).to_string()).unwrap();
            assert_eq!(parsed, *method);
        }
    }

    #[test]
    fn test_selection_accepts_slug_and_whitespace() {
        assert_eq!(
            CleaningMethod::from_selection("  Ultra \n").unwrap(),
            CleaningMethod::UltraParanoid
        );
        assert_eq!("4".parse::<CleaningMethod>().unwrap(), CleaningMethod::Paranoid);
    }

    #[test_case("0"; "zero")]
    #[test_case("12"; "past the end")]
    #[test_case(""; "empty")]
    #[test_case("-1"; "negative")]
    #[test_case("gutmann"; "unknown name")]
    fn test_invalid_selection(token: &str) {
        let err = CleaningMethod::from_selection(token).unwrap_err();
        assert!(matches!(err, CleanerError::InvalidSelection(_)));
    }

    #[test]
    fn test_zero_free_space_is_configuration_error() {
        let err = CleaningMethod::UltraParanoid.build_plan(0, None).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, CleanerError::InsufficientSpace { available_mb: 0 }));
    }

    #[test]
    fn test_shell_methods_ignore_free_space() {
        assert!(CleaningMethod::Standard.build_plan(0, None).is_ok());
        assert!(CleaningMethod::Deep.build_plan(0, None).is_ok());
    }

    #[test]
    fn test_size_clamped_to_free_space_and_cap() {
        assert_eq!(CleaningMethod::Secure.scratch_size_mb(10_000, None).unwrap(), 100);
        assert_eq!(CleaningMethod::Secure.scratch_size_mb(42, None).unwrap(), 42);
        assert_eq!(CleaningMethod::Secure.scratch_size_mb(10_000, Some(5)).unwrap(), 5);
    }

    #[test]
    fn test_paranoid_sources_and_labels() {
        let plan = CleaningMethod::Paranoid.build_plan(10_000, None).unwrap();
        use FillSource::{Urandom, Zero};
        assert_eq!(overwrite_sources(&plan), vec![Zero, Urandom, Zero, Urandom, Zero]);
        assert_eq!(plan.passes()[1].label(), "Pass 2/5 (urandom)");
        assert_eq!(plan.delay(), Duration::from_secs(2));
        assert_eq!(plan.scratch_name(), "paranoid_wipe");
    }

    #[test]
    fn test_ultra_zero_bookends_and_sync() {
        let plan = CleaningMethod::UltraParanoid.build_plan(10_000, None).unwrap();
        let sources = overwrite_sources(&plan);
        assert_eq!(sources[0], FillSource::Zero);
        assert_eq!(sources[34], FillSource::Zero);
        assert!(sources[1..34].iter().all(|s| *s == FillSource::Urandom));
        match plan.passes()[0].action() {
            PassAction::Overwrite(spec) => {
                assert!(spec.sync);
                assert_eq!(spec.size_mb, 10);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_shred_labels_use_descriptions() {
        let plan = CleaningMethod::MilitaryShredding.build_plan(10_000, None).unwrap();
        let labels: Vec<&str> = plan.passes().iter().map(|p| p.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Shred 1/5 (NSA Random)",
                "Shred 2/5 (Zero Fill)",
                "Shred 3/5 (One Fill)",
                "Shred 4/5 (Crypto Random)",
                "Shred 5/5 (Final Zero)",
            ]
        );
    }

    #[test]
    fn test_quantum_labels_show_fibonacci_bytes() {
        let plan = CleaningMethod::QuantumEntanglement.build_plan(10_000, None).unwrap();
        assert_eq!(plan.passes()[0].label(), "Quantum 1/8 (0x00)");
        assert_eq!(plan.passes()[7].label(), "Quantum 8/8 (0x0D)");
    }

    #[test]
    fn test_temporal_rotation() {
        let plan = CleaningMethod::TemporalFlux.build_plan(10_000, None).unwrap();
        let sources = overwrite_sources(&plan);
        for (i, src) in sources.iter().enumerate() {
            let expected = if i % 3 == 1 { FillSource::Urandom } else { FillSource::Zero };
            assert_eq!(*src, expected, "pass {}", i + 1);
        }
    }

    #[test]
    fn test_neural_starts_random() {
        let plan = CleaningMethod::NeuralNetwork.build_plan(10_000, None).unwrap();
        assert_eq!(plan.passes()[0].label(), "Neural 1/12 (urandom)");
        assert_eq!(plan.passes()[1].label(), "Neural 2/12 (zero)");
    }

    #[test]
    fn test_standard_uses_half_second_delay() {
        let plan = CleaningMethod::Standard.build_plan(0, None).unwrap();
        assert_eq!(plan.delay(), Duration::from_millis(500));
        assert!(plan.passes().iter().all(|p| p.label() == "Cache cleaning"));
    }
}
