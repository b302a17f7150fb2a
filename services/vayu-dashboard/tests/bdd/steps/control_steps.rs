//! BDD step definitions for manual fan override

use cucumber::{then, when};

use vayu_dashboard::ControlStatus;

use crate::world::VayuWorld;

#[when(expr = "the control status for {string} is recorded")]
async fn record_control_status(world: &mut VayuWorld, device: String) {
    let status = world.client().get_control_status(&device).await.unwrap();
    world.control_before = Some(status);
}

#[when(expr = "an override for {string} sets the fan off")]
async fn override_fan_off(world: &mut VayuWorld, device: String) {
    let status = world
        .client()
        .set_control_override(&device, false, 0)
        .await
        .unwrap();
    assert_eq!(status, ControlStatus::new(false, 0));
}

#[when(expr = "an override for {string} sets the fan on at {int} percent")]
async fn override_fan_on(world: &mut VayuWorld, device: String, intensity: u8) {
    let status = world
        .client()
        .set_control_override(&device, true, intensity)
        .await
        .unwrap();
    assert!(status.fan_on);
    assert_eq!(status.fan_intensity, intensity);
}

#[when(expr = "the override for {string} is cleared")]
async fn clear_override(world: &mut VayuWorld, device: String) {
    world.client().clear_control_override(&device).await.unwrap();
    let status = world.client().get_control_status(&device).await.unwrap();
    world.control_after = Some(status);
}

#[then(expr = "the control status for {string} should report the fan on at {int} percent")]
async fn control_reports(world: &mut VayuWorld, device: String, intensity: u8) {
    let status = world.client().get_control_status(&device).await.unwrap();
    assert!(status.fan_on);
    assert_eq!(status.fan_intensity, intensity);
}

#[then("the control status should match the recorded one")]
fn control_matches_recorded(world: &mut VayuWorld) {
    let before = world.control_before.as_ref().expect("status not recorded");
    let after = world.control_after.as_ref().expect("override not cleared");
    assert_eq!(before, after);
}
