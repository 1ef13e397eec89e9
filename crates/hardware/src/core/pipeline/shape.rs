//! Pipeline shape descriptor.
//!
//! A shape selects which variant of the hazard and forwarding logic the engine
//! instantiates. It provides:
//! 1. **Structure:** Datapath type, issue width, and the ordered list of stages.
//! 2. **Control Policy:** Branch strategy, delay-slot count, and resolution stage.
//! 3. **Units:** Whether forwarding and hazard detection are wired in at all.
//! 4. **Probes:** The extra probe capabilities implied by the above.
//! 5. **Validation:** Rejection of combinations the engine does not define.
//!
//! Shapes are plain `Copy` values; the engine keeps its own copy and never refers
//! back to the catalog it came from.

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Datapath organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DatapathType {
    /// One instruction completes per cycle; no stage latches.
    SingleStage,
    /// Classic IF, ID, EX, MEM, WB.
    FiveStage,
    /// IF, ID, II, EX, MEM, WB with two lanes per stage.
    SixStageDual,
}

/// What happens to instructions fetched behind an unresolved branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BranchStrategy {
    /// No speculation is possible (single-stage datapath).
    NotApplicable,
    /// Fall-through instructions proceed and are squashed on a taken branch.
    PredictNotTaken,
    /// A fixed number of fall-through instructions always execute.
    DelayedBranch,
}

/// Stage in which the branch outcome becomes known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BranchResolution {
    /// Operand stage; needs branch-operand forwarding into decode.
    Decode,
    /// Execute stage, combinationally.
    Execute,
    /// Memory stage, from a flag registered at the execute/memory boundary.
    Memory,
}

/// Register width of the modelled ISA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize)]
pub enum Xlen {
    /// 32-bit registers.
    #[default]
    #[serde(rename = "32", alias = "RV32")]
    X32,
    /// 64-bit registers.
    #[serde(rename = "64", alias = "RV64")]
    X64,
}

impl Xlen {
    /// Truncates a value to the register width, sign-extending 32-bit results.
    pub const fn normalize(self, val: u64) -> u64 {
        match self {
            Self::X32 => val as u32 as i32 as i64 as u64,
            Self::X64 => val,
        }
    }

    /// Mask applied to shift amounts.
    pub const fn shamt_mask(self) -> u64 {
        match self {
            Self::X32 => 0x1f,
            Self::X64 => 0x3f,
        }
    }
}

/// Kind of a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Instruction fetch.
    Fetch,
    /// Decode and, in five-stage shapes, register read.
    Decode,
    /// Issue and register read (dual-issue shape).
    Issue,
    /// Execute.
    Execute,
    /// Data memory access.
    Memory,
    /// Register write-back.
    Writeback,
}

impl StageKind {
    /// Short stage name used in traces.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fetch => "IF",
            Self::Decode => "ID",
            Self::Issue => "II",
            Self::Execute => "EX",
            Self::Memory => "MEM",
            Self::Writeback => "WB",
        }
    }
}

const SINGLE_STAGES: [StageKind; 1] = [StageKind::Execute];

const FIVE_STAGES: [StageKind; 5] = [
    StageKind::Fetch,
    StageKind::Decode,
    StageKind::Execute,
    StageKind::Memory,
    StageKind::Writeback,
];

const SIX_STAGES: [StageKind; 6] = [
    StageKind::Fetch,
    StageKind::Decode,
    StageKind::Issue,
    StageKind::Execute,
    StageKind::Memory,
    StageKind::Writeback,
];

/// Extra probe a shape wires into the hazard and forwarding units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Probe {
    /// Branch operands are compared in the operand stage and need their own
    /// forwarding selectors; memory-stage loads feeding them are hazards.
    DecodeBranchOperands,
    /// The branch outcome is registered at the execute/memory boundary.
    RegisteredBranchFlag,
}

/// Set of [`Probe`] capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeSet(u8);

impl ProbeSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    const fn bit(probe: Probe) -> u8 {
        match probe {
            Probe::DecodeBranchOperands => 1,
            Probe::RegisteredBranchFlag => 2,
        }
    }

    /// Returns the set with `probe` added.
    #[must_use]
    pub const fn with(self, probe: Probe) -> Self {
        Self(self.0 | Self::bit(probe))
    }

    /// Returns `true` if `probe` is in the set.
    pub const fn contains(self, probe: Probe) -> bool {
        self.0 & Self::bit(probe) != 0
    }
}

/// Structural description of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineShape {
    /// Datapath organisation.
    pub datapath: DatapathType,
    /// Branch handling strategy.
    pub branch_strategy: BranchStrategy,
    /// Number of branch delay slots (0-3).
    #[serde(default)]
    pub branch_delay_slots: u8,
    /// Stage in which branches resolve.
    #[serde(default = "PipelineShape::default_resolution")]
    pub branch_resolution: BranchResolution,
    /// Operand forwarding unit present.
    pub forwarding: bool,
    /// Hazard detection unit present.
    pub hazard_detection: bool,
    /// Register width.
    #[serde(default)]
    pub xlen: Xlen,
}

impl PipelineShape {
    fn default_resolution() -> BranchResolution {
        BranchResolution::Execute
    }

    /// Single-stage shape of the given width.
    pub const fn single_stage(xlen: Xlen) -> Self {
        Self {
            datapath: DatapathType::SingleStage,
            branch_strategy: BranchStrategy::NotApplicable,
            branch_delay_slots: 0,
            branch_resolution: BranchResolution::Execute,
            forwarding: false,
            hazard_detection: false,
            xlen,
        }
    }

    /// Classic five-stage shape with both units and branches resolved in execute.
    pub const fn five_stage(xlen: Xlen) -> Self {
        Self {
            datapath: DatapathType::FiveStage,
            branch_strategy: BranchStrategy::PredictNotTaken,
            branch_delay_slots: 0,
            branch_resolution: BranchResolution::Execute,
            forwarding: true,
            hazard_detection: true,
            xlen,
        }
    }

    /// Stages in pipeline order.
    pub const fn stages(&self) -> &'static [StageKind] {
        match self.datapath {
            DatapathType::SingleStage => &SINGLE_STAGES,
            DatapathType::FiveStage => &FIVE_STAGES,
            DatapathType::SixStageDual => &SIX_STAGES,
        }
    }

    /// Number of stages.
    pub const fn depth(&self) -> usize {
        self.stages().len()
    }

    /// Instructions per stage per cycle.
    pub const fn width(&self) -> usize {
        match self.datapath {
            DatapathType::SixStageDual => 2,
            DatapathType::SingleStage | DatapathType::FiveStage => 1,
        }
    }

    /// Returns `true` for every datapath with stage latches.
    pub const fn is_pipelined(&self) -> bool {
        !matches!(self.datapath, DatapathType::SingleStage)
    }

    /// Index of the stage that reads the register file.
    pub const fn operand_stage(&self) -> usize {
        self.depth().saturating_sub(4)
    }

    /// Index of the execute stage.
    pub const fn execute_stage(&self) -> usize {
        self.depth().saturating_sub(3)
    }

    /// Index of the memory stage.
    pub const fn memory_stage(&self) -> usize {
        self.depth().saturating_sub(2)
    }

    /// Index of the write-back stage.
    pub const fn writeback_stage(&self) -> usize {
        self.depth().saturating_sub(1)
    }

    /// Index of the stage in which branches resolve.
    pub const fn resolution_stage(&self) -> usize {
        match self.branch_resolution {
            BranchResolution::Decode => self.operand_stage(),
            BranchResolution::Execute => self.execute_stage(),
            BranchResolution::Memory => self.memory_stage(),
        }
    }

    /// Instructions fetched behind a branch before it resolves.
    pub const fn branch_shadow(&self) -> u8 {
        match self.branch_resolution {
            BranchResolution::Decode => 1,
            BranchResolution::Execute => 2,
            BranchResolution::Memory => 3,
        }
    }

    /// Extra probes implied by the shape.
    pub const fn probes(&self) -> ProbeSet {
        let mut probes = ProbeSet::EMPTY;
        if !self.is_pipelined() {
            return probes;
        }
        match self.branch_resolution {
            BranchResolution::Decode => probes = probes.with(Probe::DecodeBranchOperands),
            BranchResolution::Memory => probes = probes.with(Probe::RegisteredBranchFlag),
            BranchResolution::Execute => {}
        }
        probes
    }

    /// Checks that the engine defines this combination.
    ///
    /// # Returns
    ///
    /// `Ok(())` for a buildable shape, otherwise the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.datapath {
            DatapathType::SingleStage => {
                if self.forwarding || self.hazard_detection {
                    return Err(ConfigError::UnitsOnSingleStage);
                }
                if self.branch_strategy != BranchStrategy::NotApplicable
                    || self.branch_delay_slots != 0
                {
                    return Err(self.slot_mismatch());
                }
                Ok(())
            }
            DatapathType::FiveStage => self.validate_branching(),
            DatapathType::SixStageDual => {
                if self.branch_strategy == BranchStrategy::DelayedBranch {
                    return Err(ConfigError::UnsupportedWiring {
                        datapath: self.datapath,
                        feature: "delayed branches",
                    });
                }
                if self.branch_resolution != BranchResolution::Execute {
                    return Err(ConfigError::UnsupportedWiring {
                        datapath: self.datapath,
                        feature: "branch resolution outside execute",
                    });
                }
                if !(self.forwarding && self.hazard_detection) {
                    return Err(ConfigError::UnsupportedWiring {
                        datapath: self.datapath,
                        feature: "operation without forwarding and hazard detection",
                    });
                }
                self.validate_branching()
            }
        }
    }

    fn validate_branching(&self) -> Result<(), ConfigError> {
        let consistent = match self.branch_strategy {
            BranchStrategy::NotApplicable => false,
            BranchStrategy::PredictNotTaken => self.branch_delay_slots == 0,
            BranchStrategy::DelayedBranch => self.branch_delay_slots == self.branch_shadow(),
        };
        if consistent {
            Ok(())
        } else {
            Err(self.slot_mismatch())
        }
    }

    const fn slot_mismatch(&self) -> ConfigError {
        ConfigError::DelaySlotMismatch {
            strategy: self.branch_strategy,
            slots: self.branch_delay_slots,
            resolution: self.branch_resolution,
        }
    }
}
