//! Program Loader Tests.

use std::io::Write;
use std::path::Path;

use pipesim_core::catalog;
use pipesim_core::common::error::{ConfigError, SimError};
use pipesim_core::isa::instruction::Instruction;
use pipesim_core::sim::loader::{self, Program};
use pipesim_core::sim::syscall::DefaultHandler;
use pipesim_core::{Pipeline, Status};

#[test]
fn fetch_is_word_aligned_and_bounded() {
    let prog = Program::new(
        0x100,
        vec![Instruction::addi(1, 0, 1), Instruction::addi(2, 0, 2)],
    )
    .unwrap();
    assert_eq!(prog.len(), 2);
    assert_eq!(prog.end(), 0x108);
    assert_eq!(prog.fetch(0x104), Some(Instruction::addi(2, 0, 2)));
    assert_eq!(prog.fetch(0x102), None);
    assert_eq!(prog.fetch(0xFC), None);
    assert!(!prog.contains(0x108));
}

#[test]
fn misaligned_base_is_rejected() {
    assert_eq!(
        Program::new(6, vec![]),
        Err(ConfigError::MisalignedBase(6))
    );
}

#[test]
fn program_past_the_top_of_memory_is_rejected() {
    let base = u64::MAX - 3;
    assert_eq!(
        Program::new(base, vec![Instruction::addi(1, 0, 1)]),
        Err(ConfigError::ProgramOverflow { base, len: 1 })
    );

    let text = format!(r#"{{"base": {base}, "instructions": [{{"op": "addi", "rd": 1, "rs1": 0, "imm": 1}}]}}"#);
    assert!(matches!(
        Program::from_json(&text),
        Err(ConfigError::ProgramOverflow { len: 1, .. })
    ));
}

#[test]
fn program_ending_below_the_top_of_memory_is_accepted() {
    let base = u64::MAX - 7;
    let prog = Program::new(base, vec![Instruction::addi(1, 0, 1)]).unwrap();
    assert_eq!(prog.end(), u64::MAX - 3);
    assert_eq!(prog.fetch(base), Some(Instruction::addi(1, 0, 1)));
    assert!(!prog.contains(u64::MAX - 3));

    let empty = Program::new(u64::MAX - 3, vec![]).unwrap();
    assert_eq!(empty.end(), u64::MAX - 3);
}

#[test]
fn json_program_parses() {
    let prog = Program::from_json(
        r#"{
            "base": 16,
            "instructions": [
                { "op": "lw", "rd": 5, "rs1": 2, "imm": 8 },
                { "op": "ecall" }
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(prog.base(), 16);
    assert_eq!(prog.fetch(16), Some(Instruction::lw(5, 2, 8)));
    assert_eq!(prog.fetch(20), Some(Instruction::ecall()));
}

#[test]
fn out_of_range_register_names_its_position() {
    let err = Program::from_json(
        r#"{ "instructions": [ { "op": "nop" }, { "op": "add", "rd": 33 } ] }"#,
    )
    .unwrap_err();
    assert_eq!(
        err,
        ConfigError::RegisterOutOfRange {
            index: 33,
            position: 1
        }
    );
}

#[test]
fn load_program_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "instructions": [ {{ "op": "addi", "rd": 1, "imm": 3 }} ] }}"#).unwrap();
    let prog = loader::load_program(file.path()).unwrap();
    assert_eq!(prog.fetch(0), Some(Instruction::addi(1, 0, 3)));
}

#[test]
fn load_program_reports_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        loader::load_program(dir.path().join("missing.json")),
        Err(SimError::Io { .. })
    ));
}

#[test]
fn bundled_demos_run_on_every_protected_processor() {
    let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    let forwarding = loader::load_program(demos.join("forwarding.json")).unwrap();
    let branches = loader::load_program(demos.join("branches.json")).unwrap();
    for info in catalog::available()
        .iter()
        .filter(|p| p.tags.hazard_detection || !p.shape().is_pipelined())
    {
        let mut cpu = Pipeline::with_handler(
            info.shape(),
            forwarding.clone(),
            DefaultHandler::default(),
        )
        .unwrap();
        assert_eq!(cpu.run(1_000), Status::Exited(0), "{}", info.id);
        assert_eq!(cpu.handler().output, "17", "{}", info.id);

        let mut cpu = Pipeline::new(info.shape(), branches.clone()).unwrap();
        assert_eq!(cpu.run(1_000), Status::Exited(15), "{}", info.id);
    }
}
