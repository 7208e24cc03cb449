use puppet_api_core::TextureImage;

use crate::settings::ModelSettings;

#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionBuffer {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MotionGroupBuffers {
    pub name: String,
    pub clips: Vec<Vec<u8>>,
    /// Voice track for the group; the first clip declaring a sound wins.
    pub voice: Option<Vec<u8>>,
}

/// Everything fetched for one puppet. Immutable once built.
#[derive(Clone, Debug)]
pub struct ModelBundle {
    pub settings: ModelSettings,
    pub topology: Vec<u8>,
    pub expressions: Vec<ExpressionBuffer>,
    pub physics: Option<Vec<u8>>,
    pub pose: Option<Vec<u8>>,
    pub user_data: Option<Vec<u8>>,
    pub motion_groups: Vec<MotionGroupBuffers>,
    pub textures: Vec<TextureImage>,
}

impl ModelBundle {
    pub fn motion_group(&self, name: &str) -> Option<&MotionGroupBuffers> {
        self.motion_groups.iter().find(|g| g.name == name)
    }

    pub fn expression(&self, name: &str) -> Option<&ExpressionBuffer> {
        self.expressions.iter().find(|e| e.name == name)
    }

    /// Total bytes held, decoded textures included.
    pub fn size_bytes(&self) -> usize {
        let opt = |b: &Option<Vec<u8>>| b.as_ref().map(Vec::len).unwrap_or(0);
        self.topology.len()
            + self.expressions.iter().map(|e| e.bytes.len()).sum::<usize>()
            + opt(&self.physics)
            + opt(&self.pose)
            + opt(&self.user_data)
            + self
                .motion_groups
                .iter()
                .map(|g| g.clips.iter().map(Vec::len).sum::<usize>() + opt(&g.voice))
                .sum::<usize>()
            + self.textures.iter().map(TextureImage::byte_len).sum::<usize>()
    }
}
