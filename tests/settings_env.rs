//! Environment variables are process-wide, so these checks live in their own test binary.
use offload::{Flavor, Outcome, Scene, Settings};

#[test]
fn environment_overrides_defaults() -> Outcome<()> {
    let dir = tempfile::tempdir()?;
    let absent = dir.path().join("absent");
    let name = absent.to_string_lossy();
    std::env::set_var("OFFLOAD_FLAVOR", "bad");
    std::env::set_var("OFFLOAD_SCENES", "cache,task_group");
    std::env::set_var("OFFLOAD_FIB_NUMBERS", "3,4");
    std::env::set_var("OFFLOAD_FILE_LINES", "7");
    std::env::set_var("OFFLOAD_MEMO_CAPACITY", "2");

    let settings = Settings::read(&name)?;
    assert_eq!(*settings.flavor(), Flavor::Bad);
    assert_eq!(settings.scenes(), &vec![Scene::Cache, Scene::TaskGroup]);
    assert_eq!(settings.fib_numbers(), &vec![3, 4]);
    assert_eq!(*settings.file_lines(), 7);
    assert_eq!(*settings.memo_capacity(), Some(2));
    // untouched keys keep their defaults
    assert_eq!(settings.heartbeat_ms(), Settings::default().heartbeat_ms());
    Ok(())
}
