//! Well-known parameter ids and hit-region names.

pub const PARAM_ANGLE_X: &str = "ParamAngleX";
pub const PARAM_ANGLE_Y: &str = "ParamAngleY";
pub const PARAM_ANGLE_Z: &str = "ParamAngleZ";
pub const PARAM_BODY_ANGLE_X: &str = "ParamBodyAngleX";
pub const PARAM_EYE_BALL_X: &str = "ParamEyeBallX";
pub const PARAM_EYE_BALL_Y: &str = "ParamEyeBallY";
pub const PARAM_BREATH: &str = "ParamBreath";
pub const PARAM_MOUTH_OPEN_Y: &str = "ParamMouthOpenY";
pub const PARAM_EYE_L_OPEN: &str = "ParamEyeLOpen";
pub const PARAM_EYE_R_OPEN: &str = "ParamEyeROpen";

pub const HIT_AREA_HEAD: &str = "Head";
pub const HIT_AREA_BODY: &str = "Body";

pub const MOTION_GROUP_IDLE: &str = "Idle";
pub const MOTION_GROUP_TAP_BODY: &str = "TapBody";

/// Eye parameters driven by blinking when the settings declare none.
pub const DEFAULT_EYE_BLINK_IDS: [&str; 2] = [PARAM_EYE_L_OPEN, PARAM_EYE_R_OPEN];
/// Mouth parameters driven by lipsync when the settings declare none.
pub const DEFAULT_LIP_SYNC_IDS: [&str; 1] = [PARAM_MOUTH_OPEN_Y];
