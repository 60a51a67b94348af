use std::fs;

use emuterm_machine::{MachineError, MachineLoader};

#[test]
fn buildroot_bundle_renders_full_config() {
    let bundle = tempfile::tempdir().unwrap();
    fs::write(
        bundle.path().join("machine.json"),
        r#"{
            "BIOS": "bbl64.bin",
            "Kernel": "kernel-riscv64.bin",
            "KernelCommandLine": "console=hvc0 root=/dev/vda rw",
            "RootDrive": "root-riscv64.bin"
        }"#,
    )
    .unwrap();
    let scratch = tempfile::tempdir().unwrap();

    let loader = MachineLoader::new(scratch.path());
    loader.load(bundle.path()).unwrap();
    let config = fs::read_to_string(loader.config_path()).unwrap();

    let root = bundle.path().display().to_string();
    assert!(config.starts_with("{\n    version: 1,\n"));
    assert!(config.contains("    machine: \"riscv64\",\n"));
    assert!(config.contains("    memory_size: 128,\n"));
    assert!(config.contains(&format!("    kernel: \"{root}/kernel-riscv64.bin\",\n")));
    assert!(config.contains(&format!("    drive0: {{ file: \"{root}/root-riscv64.bin\" }},\n")));
    assert!(config.ends_with("    eth0: { driver: \"user\" },\n}"));
}

#[test]
fn reloading_replaces_previous_config() {
    let scratch = tempfile::tempdir().unwrap();
    let loader = MachineLoader::new(scratch.path());

    let first = tempfile::tempdir().unwrap();
    fs::write(first.path().join("machine.toml"), "BIOS = \"one.bin\"\n").unwrap();
    loader.load(first.path()).unwrap();

    let second = tempfile::tempdir().unwrap();
    fs::write(second.path().join("machine.toml"), "BIOS = \"two.bin\"\n").unwrap();
    loader.load(second.path()).unwrap();

    let config = fs::read_to_string(loader.config_path()).unwrap();
    assert!(config.contains("two.bin"));
    assert!(!config.contains("one.bin"));
}

#[test]
fn empty_bundle_is_missing_description() {
    let bundle = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let err = MachineLoader::new(scratch.path())
        .load(bundle.path())
        .unwrap_err();
    assert!(matches!(err, MachineError::MissingDescription { .. }));
}
