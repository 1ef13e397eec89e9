//! Processor catalog.
//!
//! This module is the static registry of processors the simulator can build. It provides:
//! 1. **Identifiers:** One [`ProcessorId`] per ISA and datapath variant.
//! 2. **Tags:** The datapath, branch policy, and unit wiring that tell variants apart.
//! 3. **Queries:** Enumeration, lookup by id, and lookup by ISA and tags.
//!
//! The registry is built once per process and never mutated. Consumers take a
//! [`PipelineShape`] from it by value.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::common::error::ConfigError;
use crate::core::pipeline::shape::{
    BranchResolution, BranchStrategy, DatapathType, PipelineShape, Xlen,
};

/// Identifier of a catalog processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[allow(non_camel_case_types, missing_docs)]
pub enum ProcessorId {
    RV32_SS,
    RV32_5S_NO_FW_HZ,
    RV32_5S_NO_HZ,
    RV32_5S_NO_FW,
    RV32_5S,
    RV32_5S_1S,
    RV32_5S_1S_DB,
    RV32_5S_2S_DB,
    RV32_5S_3S,
    RV32_5S_3S_DB,
    RV32_6S_DUAL,
    RV64_SS,
    RV64_5S_NO_FW_HZ,
    RV64_5S_NO_HZ,
    RV64_5S_NO_FW,
    RV64_5S,
    RV64_5S_1S,
    RV64_5S_1S_DB,
    RV64_5S_2S_DB,
    RV64_5S_3S,
    RV64_5S_3S_DB,
    RV64_6S_DUAL,
}

impl ProcessorId {
    /// Every processor, in catalog order.
    pub const ALL: [Self; 22] = [
        Self::RV32_SS,
        Self::RV32_5S_NO_FW_HZ,
        Self::RV32_5S_NO_HZ,
        Self::RV32_5S_NO_FW,
        Self::RV32_5S,
        Self::RV32_5S_1S,
        Self::RV32_5S_1S_DB,
        Self::RV32_5S_2S_DB,
        Self::RV32_5S_3S,
        Self::RV32_5S_3S_DB,
        Self::RV32_6S_DUAL,
        Self::RV64_SS,
        Self::RV64_5S_NO_FW_HZ,
        Self::RV64_5S_NO_HZ,
        Self::RV64_5S_NO_FW,
        Self::RV64_5S,
        Self::RV64_5S_1S,
        Self::RV64_5S_1S_DB,
        Self::RV64_5S_2S_DB,
        Self::RV64_5S_3S,
        Self::RV64_5S_3S_DB,
        Self::RV64_6S_DUAL,
    ];

    /// Catalog name, as accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::RV32_SS => "RV32_SS",
            Self::RV32_5S_NO_FW_HZ => "RV32_5S_NO_FW_HZ",
            Self::RV32_5S_NO_HZ => "RV32_5S_NO_HZ",
            Self::RV32_5S_NO_FW => "RV32_5S_NO_FW",
            Self::RV32_5S => "RV32_5S",
            Self::RV32_5S_1S => "RV32_5S_1S",
            Self::RV32_5S_1S_DB => "RV32_5S_1S_DB",
            Self::RV32_5S_2S_DB => "RV32_5S_2S_DB",
            Self::RV32_5S_3S => "RV32_5S_3S",
            Self::RV32_5S_3S_DB => "RV32_5S_3S_DB",
            Self::RV32_6S_DUAL => "RV32_6S_DUAL",
            Self::RV64_SS => "RV64_SS",
            Self::RV64_5S_NO_FW_HZ => "RV64_5S_NO_FW_HZ",
            Self::RV64_5S_NO_HZ => "RV64_5S_NO_HZ",
            Self::RV64_5S_NO_FW => "RV64_5S_NO_FW",
            Self::RV64_5S => "RV64_5S",
            Self::RV64_5S_1S => "RV64_5S_1S",
            Self::RV64_5S_1S_DB => "RV64_5S_1S_DB",
            Self::RV64_5S_2S_DB => "RV64_5S_2S_DB",
            Self::RV64_5S_3S => "RV64_5S_3S",
            Self::RV64_5S_3S_DB => "RV64_5S_3S_DB",
            Self::RV64_6S_DUAL => "RV64_6S_DUAL",
        }
    }

    /// ISA the processor implements.
    pub const fn isa(self) -> Isa {
        match self {
            Self::RV32_SS
            | Self::RV32_5S_NO_FW_HZ
            | Self::RV32_5S_NO_HZ
            | Self::RV32_5S_NO_FW
            | Self::RV32_5S
            | Self::RV32_5S_1S
            | Self::RV32_5S_1S_DB
            | Self::RV32_5S_2S_DB
            | Self::RV32_5S_3S
            | Self::RV32_5S_3S_DB
            | Self::RV32_6S_DUAL => Isa::RV32I,
            Self::RV64_SS
            | Self::RV64_5S_NO_FW_HZ
            | Self::RV64_5S_NO_HZ
            | Self::RV64_5S_NO_FW
            | Self::RV64_5S
            | Self::RV64_5S_1S
            | Self::RV64_5S_1S_DB
            | Self::RV64_5S_2S_DB
            | Self::RV64_5S_3S
            | Self::RV64_5S_3S_DB
            | Self::RV64_6S_DUAL => Isa::RV64I,
        }
    }
}

impl fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProcessorId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownProcessor(s.to_owned()))
    }
}

/// Base integer ISA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Isa {
    RV32I,
    RV64I,
}

impl Isa {
    /// Register width of the ISA.
    pub const fn xlen(self) -> Xlen {
        match self {
            Self::RV32I => Xlen::X32,
            Self::RV64I => Xlen::X64,
        }
    }
}

/// Properties that distinguish processors of one ISA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessorTags {
    /// Datapath layout.
    pub datapath: DatapathType,
    /// Control hazard policy.
    pub branch_strategy: BranchStrategy,
    /// Delay slots after a taken transfer.
    pub branch_delay_slots: u8,
    /// Stage that resolves branches.
    pub branch_resolution: BranchResolution,
    /// Forwarding unit present.
    pub forwarding: bool,
    /// Hazard unit present.
    pub hazard_detection: bool,
}

impl ProcessorTags {
    const fn shape(self, xlen: Xlen) -> PipelineShape {
        PipelineShape {
            datapath: self.datapath,
            branch_strategy: self.branch_strategy,
            branch_delay_slots: self.branch_delay_slots,
            branch_resolution: self.branch_resolution,
            forwarding: self.forwarding,
            hazard_detection: self.hazard_detection,
            xlen,
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorInfo {
    /// Identifier.
    pub id: ProcessorId,
    /// Human-readable name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// ISA implemented.
    pub isa: Isa,
    /// Distinguishing properties.
    pub tags: ProcessorTags,
}

impl ProcessorInfo {
    /// Pipeline shape of this processor.
    pub const fn shape(&self) -> PipelineShape {
        self.tags.shape(self.isa.xlen())
    }
}

/// Variant table shared by both ISAs.
///
/// Fields: name suffix, human name, description, datapath, strategy, slots,
/// resolution, forwarding, hazard detection.
#[allow(clippy::type_complexity)]
const VARIANTS: [(
    &str,
    &str,
    DatapathType,
    BranchStrategy,
    u8,
    BranchResolution,
    bool,
    bool,
); 11] = [
    (
        "Single-cycle processor",
        "Executes one instruction per cycle with no pipelining.",
        DatapathType::SingleStage,
        BranchStrategy::NotApplicable,
        0,
        BranchResolution::Execute,
        false,
        false,
    ),
    (
        "5-stage processor w/o forwarding or hazard detection",
        "The program must insert its own nops between dependent instructions.",
        DatapathType::FiveStage,
        BranchStrategy::PredictNotTaken,
        0,
        BranchResolution::Execute,
        false,
        false,
    ),
    (
        "5-stage processor w/o hazard detection",
        "Forwards results but never stalls; load-use pairs need a nop.",
        DatapathType::FiveStage,
        BranchStrategy::PredictNotTaken,
        0,
        BranchResolution::Execute,
        true,
        false,
    ),
    (
        "5-stage processor w/o forwarding unit",
        "Stalls every dependent instruction until its producer writes back.",
        DatapathType::FiveStage,
        BranchStrategy::PredictNotTaken,
        0,
        BranchResolution::Execute,
        false,
        true,
    ),
    (
        "5-stage processor",
        "Forwarding and hazard detection; branches resolve in execute.",
        DatapathType::FiveStage,
        BranchStrategy::PredictNotTaken,
        0,
        BranchResolution::Execute,
        true,
        true,
    ),
    (
        "5-stage processor, branch in decode",
        "Branches compare forwarded operands in decode; one instruction is squashed.",
        DatapathType::FiveStage,
        BranchStrategy::PredictNotTaken,
        0,
        BranchResolution::Decode,
        true,
        true,
    ),
    (
        "5-stage processor, 1 delay slot",
        "Branches resolve in decode; the following instruction always executes.",
        DatapathType::FiveStage,
        BranchStrategy::DelayedBranch,
        1,
        BranchResolution::Decode,
        true,
        true,
    ),
    (
        "5-stage processor, 2 delay slots",
        "Branches resolve in execute; the two following instructions always execute.",
        DatapathType::FiveStage,
        BranchStrategy::DelayedBranch,
        2,
        BranchResolution::Execute,
        true,
        true,
    ),
    (
        "5-stage processor, branch in memory",
        "Branch outcomes are registered into memory; three instructions are squashed.",
        DatapathType::FiveStage,
        BranchStrategy::PredictNotTaken,
        0,
        BranchResolution::Memory,
        true,
        true,
    ),
    (
        "5-stage processor, 3 delay slots",
        "Branches resolve in memory; the three following instructions always execute.",
        DatapathType::FiveStage,
        BranchStrategy::DelayedBranch,
        3,
        BranchResolution::Memory,
        true,
        true,
    ),
    (
        "6-stage dual-issue processor",
        "Issues two independent instructions per cycle.",
        DatapathType::SixStageDual,
        BranchStrategy::PredictNotTaken,
        0,
        BranchResolution::Execute,
        true,
        true,
    ),
];

static REGISTRY: LazyLock<Vec<ProcessorInfo>> = LazyLock::new(|| {
    ProcessorId::ALL
        .iter()
        .zip(VARIANTS.iter().cycle())
        .map(
            |(&id, &(name, description, datapath, strategy, slots, resolution, fw, hz))| {
                ProcessorInfo {
                    id,
                    name,
                    description,
                    isa: id.isa(),
                    tags: ProcessorTags {
                        datapath,
                        branch_strategy: strategy,
                        branch_delay_slots: slots,
                        branch_resolution: resolution,
                        forwarding: fw,
                        hazard_detection: hz,
                    },
                }
            },
        )
        .collect()
});

/// Every processor in catalog order.
pub fn available() -> &'static [ProcessorInfo] {
    &REGISTRY
}

/// Catalog entry for `id`.
pub fn describe(id: ProcessorId) -> &'static ProcessorInfo {
    // ALL and REGISTRY share one order.
    let idx = ProcessorId::ALL.iter().position(|&p| p == id).unwrap_or(0);
    &REGISTRY[idx]
}

/// Processors of `isa` whose tags equal `tags`.
///
/// The result holds at most one id; the catalog never repeats tags within an ISA.
pub fn find(isa: Isa, tags: &ProcessorTags) -> Vec<ProcessorId> {
    REGISTRY
        .iter()
        .filter(|p| p.isa == isa && p.tags == *tags)
        .map(|p| p.id)
        .collect()
}
