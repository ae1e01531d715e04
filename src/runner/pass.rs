use crate::exec::ShellCommand;
use crate::{CleanerError, CleanerResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Where overwrite data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillSource {
    Zero,
    Urandom,
    Random,
    /// Constant byte; 0x00 is served straight from /dev/zero
    Byte(u8),
}

impl FillSource {
    /// Device under /dev that yields this data, if there is one.
    pub fn device(&self) -> Option<&'static str> {
        match self {
            FillSource::Zero | FillSource::Byte(0x00) => Some("zero"),
            FillSource::Urandom => Some("urandom"),
            FillSource::Random => Some("random"),
            FillSource::Byte(_) => None,
        }
    }
}

impl fmt::Display for FillSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillSource::Zero => f.write_str("zero"),
            FillSource::Urandom => f.write_str("urandom"),
            FillSource::Random => f.write_str("random"),
            FillSource::Byte(b) => write!(f, "0x{:02X}", b),
        }
    }
}

/// Fill a scratch file, optionally shred it, optionally flush buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverwriteSpec {
    pub source: FillSource,
    pub size_mb: u64,
    pub shred: bool,
    pub sync: bool,
}

impl OverwriteSpec {
    pub fn new(source: FillSource, size_mb: u64) -> Self {
        Self {
            source,
            size_mb,
            shred: false,
            sync: false,
        }
    }

    pub fn with_shred(mut self) -> Self {
        self.shred = true;
        self
    }

    pub fn with_sync(mut self) -> Self {
        self.sync = true;
        self
    }

    /// Commands that make up this pass against `target`, in order.
    pub fn commands(&self, target: &Path) -> Vec<ShellCommand> {
        let target = target.display().to_string();
        let mut commands = vec![self.fill_command(&target)];

        if self.shred {
            commands.push(
                ShellCommand::new("shred")
                    .arg("-n")
                    .arg("1")
                    .arg("-z")
                    .arg(target.clone()),
            );
        }
        if self.sync {
            commands.push(ShellCommand::new("sync"));
        }

        commands
    }

    fn fill_command(&self, target: &str) -> ShellCommand {
        if let FillSource::Byte(byte @ 0x01..=0xFF) = self.source {
            return ShellCommand::shell(format!(
                "head -c {}M /dev/zero | tr '\\000' '\\{:03o}' > {}",
                self.size_mb,
                byte,
                shell_quote(target)
            ));
        }

        ShellCommand::new("dd")
            .arg(format!("if=/dev/{}", self.source.device().unwrap_or("zero")))
            .arg(format!("of={}", target))
            .arg("bs=1M")
            .arg(format!("count={}", self.size_mb))
    }
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassAction {
    /// Run each command in order; the pass fails if any of them fails.
    Shell(Vec<ShellCommand>),
    /// Overwrite-then-delete against the plan's scratch file.
    Overwrite(OverwriteSpec),
}

/// One labelled pass of a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassDescriptor {
    label: String,
    action: PassAction,
}

impl PassDescriptor {
    pub fn new(label: impl Into<String>, action: PassAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }

    pub fn shell(label: impl Into<String>, line: impl Into<String>) -> Self {
        Self::new(label, PassAction::Shell(vec![ShellCommand::shell(line)]))
    }

    pub fn overwrite(label: impl Into<String>, spec: OverwriteSpec) -> Self {
        Self::new(label, PassAction::Overwrite(spec))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn action(&self) -> &PassAction {
        &self.action
    }
}

/// Ordered pass list for one cleaning method, with its inter-pass delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassPlan {
    name: String,
    passes: Vec<PassDescriptor>,
    delay: Duration,
    destructive: bool,
    scratch_name: String,
}

impl PassPlan {
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            passes: Vec::new(),
            delay,
            destructive: false,
            scratch_name: "scratch_wipe".to_string(),
        }
    }

    /// Mark the plan as overwriting data, using `scratch_name` under the scratch dir.
    pub fn destructive(mut self, scratch_name: impl Into<String>) -> Self {
        self.destructive = true;
        self.scratch_name = scratch_name.into();
        self
    }

    pub fn with_pass(mut self, pass: PassDescriptor) -> Self {
        self.passes.push(pass);
        self
    }

    pub fn push(&mut self, pass: PassDescriptor) {
        self.passes.push(pass);
    }

    pub fn scale_delay(&mut self, factor: f64) {
        self.delay = self.delay.mul_f64(factor.max(0.0));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn passes(&self) -> &[PassDescriptor] {
        &self.passes
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_destructive(&self) -> bool {
        self.destructive
    }

    pub fn scratch_name(&self) -> &str {
        &self.scratch_name
    }

    /// Reject plans that would run a vacuous or zero-sized sequence.
    pub fn validate(&self) -> CleanerResult<()> {
        if self.passes.is_empty() {
            return Err(CleanerError::Configuration(format!(
                "'{}' has no passes configured",
                self.name
            )));
        }

        for pass in &self.passes {
            if let PassAction::Overwrite(spec) = pass.action() {
                if spec.size_mb == 0 {
                    return Err(CleanerError::Configuration(format!(
                        "pass '{}' of '{}' has a zero-sized scratch file",
                        pass.label(),
                        self.name
                    )));
                }
            }
            if let PassAction::Shell(commands) = pass.action() {
                if commands.is_empty() {
                    return Err(CleanerError::Configuration(format!(
                        "pass '{}' of '{}' has no commands",
                        pass.label(),
                        self.name
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_fill_source_devices() {
        assert_eq!(FillSource::Zero.device(), Some("zero"));
        assert_eq!(FillSource::Byte(0x00).device(), Some("zero"));
        assert_eq!(FillSource::Urandom.device(), Some("urandom"));
        assert_eq!(FillSource::Random.device(), Some("random"));
        assert_eq!(FillSource::Byte(0xFF).device(), None);
    }

    #[test]
    fn test_fill_source_display() {
        assert_eq!(FillSource::Urandom.to_string(), "urandom");
        assert_eq!(FillSource::Byte(0x0D).to_string(), "0x0D");
    }

    #[test]
    fn test_overwrite_commands_dd() {
        let spec = OverwriteSpec::new(FillSource::Urandom, 50);
        let cmds = spec.commands(&PathBuf::from("/tmp/paranoid_wipe"));
        assert_eq!(cmds.len(), 1);
        assert_eq!(
            cmds[0].to_string(),
            "dd if=/dev/urandom of=/tmp/paranoid_wipe bs=1M count=50"
        );
    }

    #[test]
    fn test_overwrite_commands_byte_fill() {
        let spec = OverwriteSpec::new(FillSource::Byte(0xFF), 20);
        let cmds = spec.commands(&PathBuf::from("/tmp/shred_file"));
        assert_eq!(
            cmds[0].script(),
            Some("head -c 20M /dev/zero | tr '\\000' '\\377' > '/tmp/shred_file'")
        );
    }

    #[test]
    fn test_overwrite_commands_shred_and_sync_order() {
        let spec = OverwriteSpec::new(FillSource::Zero, 10)
            .with_shred()
            .with_sync();
        let cmds = spec.commands(&PathBuf::from("/tmp/x"));
        let programs: Vec<&str> = cmds.iter().map(|c| c.program()).collect();
        assert_eq!(programs, vec!["dd", "shred", "sync"]);
    }

    #[test]
    fn test_validate_rejects_empty_plan() {
        let plan = PassPlan::new("empty", Duration::ZERO);
        let err = plan.validate().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        let plan = PassPlan::new("ultra", Duration::ZERO)
            .destructive("ultra_wipe")
            .with_pass(PassDescriptor::overwrite(
                "Pass 1/1",
                OverwriteSpec::new(FillSource::Zero, 0),
            ));
        assert!(plan.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_validate_accepts_shell_plan() {
        let plan = PassPlan::new("standard", Duration::from_millis(500))
            .with_pass(PassDescriptor::shell("Cache cleaning", "true"));
        assert!(plan.validate().is_ok());
        assert!(!plan.is_destructive());
    }

    #[test]
    fn test_scale_delay() {
        let mut plan = PassPlan::new("p", Duration::from_secs(2));
        plan.scale_delay(0.25);
        assert_eq!(plan.delay(), Duration::from_millis(500));
        plan.scale_delay(-1.0);
        assert_eq!(plan.delay(), Duration::ZERO);
    }
}
