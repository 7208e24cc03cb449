use puppet_animation_core::ExpressionPlayer;
use puppet_api_core::ModelState;

use super::StateLayer;

impl StateLayer for ExpressionPlayer {
    fn advance(&mut self, state: &mut ModelState, dt: f32) -> bool {
        self.update(&mut state.parameters, dt)
    }
}
