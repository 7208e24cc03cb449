#![allow(dead_code)]

use puppet_assets_core::MemorySource;
use puppet_orchestrator::{Runtime, RuntimeOptions};
use puppet_test_fixtures::mocks::{MockEngine, MockSurface};
use puppet_test_fixtures::puppets;

pub type TestRuntime = Runtime<MockEngine, MockSurface>;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

pub fn source(name: &str) -> MemorySource {
    puppets::files(name).expect("fixture files").into_iter().collect()
}

pub fn options() -> RuntimeOptions {
    RuntimeOptions {
        rng_seed: Some(42),
        ..RuntimeOptions::default()
    }
}

pub fn runtime(options: RuntimeOptions) -> TestRuntime {
    Runtime::new(MockEngine::new(), MockSurface::new(WIDTH, HEIGHT), options)
}

pub fn loaded(name: &str, options: RuntimeOptions) -> TestRuntime {
    let mut rt = runtime(options);
    rt.load(&source(name), &puppets::settings_ref(name).expect("settings ref"))
        .expect("load");
    rt
}
