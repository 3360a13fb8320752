//! Session Destruction Tests
//!
//! Tests for:
//! - Swapchain drain before reference-space teardown
//! - Usage telemetry emission
//! - Reentrant destroy failing cleanly
//! - Swapchain entry-point validation

mod common;

use common::{create_default_session, fixture};
use mirage_xr::{MirageError, SessionHandle, StructureType, SwapchainCreateInfo};

fn swapchain_info() -> SwapchainCreateInfo {
    SwapchainCreateInfo {
        ty: StructureType::SwapchainCreateInfo,
        format: 28, // DXGI_FORMAT_R8G8B8A8_UNORM
        width: 2160,
        height: 2160,
        sample_count: 1,
        array_size: 1,
        mip_count: 1,
    }
}

#[test]
fn destroy_drains_owned_swapchains_and_spaces() {
    let mut fx = fixture();
    let session = create_default_session(&mut fx);

    let left = fx.runtime.create_swapchain(session, &swapchain_info()).unwrap();
    let right = fx.runtime.create_swapchain(session, &swapchain_info()).unwrap();
    assert_eq!(fx.runtime.session().unwrap().swapchain_count(), 2);

    let origin = fx.runtime.session().unwrap().origin_space().unwrap();
    let view = fx.runtime.session().unwrap().view_space().unwrap();

    fx.runtime.destroy_session(session).unwrap();

    assert!(fx.runtime.swapchain_info(left).is_none());
    assert!(fx.runtime.swapchain_info(right).is_none());
    assert!(fx.runtime.space_type(origin).is_none());
    assert!(fx.runtime.space_type(view).is_none());
}

#[test]
fn reentrant_destroy_fails_with_handle_invalid() {
    let mut fx = fixture();
    let session = create_default_session(&mut fx);
    fx.runtime.create_swapchain(session, &swapchain_info()).unwrap();

    fx.runtime.destroy_session(session).unwrap();
    assert_eq!(
        fx.runtime.destroy_session(session),
        Err(MirageError::HandleInvalid)
    );
}

#[test]
fn destroy_with_stale_handle_leaves_session_alive() {
    let mut fx = fixture();
    create_default_session(&mut fx);

    assert_eq!(
        fx.runtime.destroy_session(SessionHandle(5)),
        Err(MirageError::HandleInvalid)
    );
    assert!(fx.runtime.session().is_some());
    assert!(fx.telemetry.borrow().usages.is_empty());
}

#[test]
fn destroy_emits_one_usage_record() {
    let mut fx = fixture();
    let session = create_default_session(&mut fx);
    fx.runtime.destroy_session(session).unwrap();

    let telemetry = fx.telemetry.borrow();
    assert_eq!(telemetry.usages.len(), 1);
    let usage = &telemetry.usages[0];
    assert!(usage.duration_seconds > 0.0);
    assert_eq!(usage.total_frame_count, 0);
}

// ============================================================================
// Swapchain entry points
// ============================================================================

#[test]
fn create_swapchain_requires_live_session_and_valid_request() {
    let mut fx = fixture();
    assert_eq!(
        fx.runtime.create_swapchain(SessionHandle(1), &swapchain_info()),
        Err(MirageError::HandleInvalid)
    );

    let session = create_default_session(&mut fx);
    let mut zero_sized = swapchain_info();
    zero_sized.width = 0;
    assert_eq!(
        fx.runtime.create_swapchain(session, &zero_sized),
        Err(MirageError::ValidationFailure)
    );
}

#[test]
fn destroy_swapchain_with_unknown_handle_fails() {
    let mut fx = fixture();
    let session = create_default_session(&mut fx);
    let handle = fx.runtime.create_swapchain(session, &swapchain_info()).unwrap();
    fx.runtime.destroy_swapchain(handle).unwrap();

    assert_eq!(
        fx.runtime.destroy_swapchain(handle),
        Err(MirageError::HandleInvalid)
    );
    assert_eq!(fx.runtime.session().unwrap().swapchain_count(), 0);
}

#[test]
fn destroying_a_swapchain_updates_the_owned_set() {
    let mut fx = fixture();
    let session = create_default_session(&mut fx);
    let handle = fx.runtime.create_swapchain(session, &swapchain_info()).unwrap();
    assert_eq!(fx.runtime.session().unwrap().swapchain_count(), 1);

    fx.runtime.destroy_swapchain(handle).unwrap();
    assert_eq!(fx.runtime.session().unwrap().swapchain_count(), 0);

    // Destruction then has nothing left to drain.
    fx.runtime.destroy_session(session).unwrap();
}
