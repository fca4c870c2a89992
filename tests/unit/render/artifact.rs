use super::*;

#[test]
fn create_append_close_is_the_happy_path() {
    let mut artifact = Artifact::new("target/unit_artifact_happy.ps");
    assert_eq!(artifact.state(), ArtifactState::Unopened);

    artifact.record_write(WriteMode::Create, true).unwrap();
    assert_eq!(artifact.state(), ArtifactState::Open);

    artifact.record_write(WriteMode::Append, true).unwrap();
    artifact.record_write(WriteMode::Append, true).unwrap();
    assert_eq!(artifact.state(), ArtifactState::Open);

    artifact.record_write(WriteMode::Append, false).unwrap();
    assert!(artifact.is_closed());
}

#[test]
fn append_before_create_is_rejected() {
    let mut artifact = Artifact::new("x.ps");
    assert!(matches!(
        artifact.record_write(WriteMode::Append, true),
        Err(VelomapError::Protocol(_))
    ));
    assert_eq!(artifact.state(), ArtifactState::Unopened);
}

#[test]
fn closing_on_the_create_write_is_rejected() {
    let mut artifact = Artifact::new("x.ps");
    assert!(artifact.record_write(WriteMode::Create, false).is_err());
    assert_eq!(artifact.state(), ArtifactState::Unopened);
}

#[test]
fn second_create_is_rejected() {
    let mut artifact = Artifact::new("x.ps");
    artifact.record_write(WriteMode::Create, true).unwrap();
    assert!(matches!(
        artifact.record_write(WriteMode::Create, true),
        Err(VelomapError::Protocol(_))
    ));
    // The failed write does not advance or corrupt the state.
    assert_eq!(artifact.state(), ArtifactState::Open);
}

#[test]
fn any_write_after_close_is_rejected() {
    let mut artifact = Artifact::new("x.ps");
    artifact.record_write(WriteMode::Create, true).unwrap();
    artifact.record_write(WriteMode::Append, false).unwrap();

    for (mode, keep_open) in [
        (WriteMode::Create, true),
        (WriteMode::Append, true),
        (WriteMode::Append, false),
    ] {
        assert!(matches!(
            artifact.record_write(mode, keep_open),
            Err(VelomapError::Protocol(_))
        ));
    }
    assert!(artifact.is_closed());
}
