pub mod keys;
pub mod runner;

pub use keys::command_for_key;
pub use runner::PoolRunner;

use std::cell::RefCell;

use pool_engine::Command;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<PoolRunner>> = RefCell::new(None);
}

/// Run `f` against the live runner. Before `pool_init` every call is a
/// logged no-op returning `R::default()`.
fn with_runner<R: Default>(f: impl FnOnce(&mut PoolRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("pool not initialized, call pool_init() first");
            R::default()
        }
    })
}

/// Build the table from a JSON config (empty string for defaults).
/// Returns false and keeps any previous table if the config is rejected.
#[wasm_bindgen]
pub fn pool_init(config_json: &str) -> bool {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    match PoolRunner::from_json(config_json) {
        Ok(runner) => {
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("pool: initialized");
            true
        }
        Err(err) => {
            log::error!("pool: bad config: {}", err);
            false
        }
    }
}

#[wasm_bindgen]
pub fn pool_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

/// Returns false when the key has no binding.
#[wasm_bindgen]
pub fn pool_key_down(key_code: u32) -> bool {
    with_runner(|r| r.key_down(key_code))
}

#[wasm_bindgen]
pub fn pool_shoot() {
    with_runner(|r| r.push_command(Command::Shoot));
}

#[wasm_bindgen]
pub fn pool_adjust_aim(delta_angle: f32, delta_power: f32) {
    with_runner(|r| r.push_command(Command::AdjustAim { delta_angle, delta_power }));
}

#[wasm_bindgen]
pub fn pool_set_aim(angle: f32, power: f32) {
    with_runner(|r| r.push_command(Command::SetAim { angle, power }));
}

#[wasm_bindgen]
pub fn pool_reset() {
    with_runner(|r| r.push_command(Command::Reset));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_buffer_ptr() -> *const f32 {
    RUNNER.with(|cell| match cell.borrow().as_ref() {
        Some(runner) => runner.buffer_ptr(),
        None => std::ptr::null(),
    })
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats())
}

#[wasm_bindgen]
pub fn get_ball_count() -> u32 {
    with_runner(|r| r.ball_count())
}

#[wasm_bindgen]
pub fn get_guide_point_count() -> u32 {
    with_runner(|r| r.guide_point_count())
}

#[wasm_bindgen]
pub fn get_event_count() -> u32 {
    with_runner(|r| r.event_count())
}

#[wasm_bindgen]
pub fn get_balls_remaining() -> u32 {
    with_runner(|r| r.balls_remaining())
}

#[wasm_bindgen]
pub fn is_idle() -> bool {
    with_runner(|r| r.is_idle())
}

#[wasm_bindgen]
pub fn is_cleared() -> bool {
    with_runner(|r| r.is_cleared())
}
