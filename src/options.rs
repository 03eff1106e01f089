use buildstructor::buildstructor;

#[derive(Debug, Clone, Copy)]
pub(crate) struct EncodeOptions {
    pub(crate) trim_seconds: u32,
}

#[buildstructor]
impl EncodeOptions {
    #[builder]
    pub(crate) fn new(trim_seconds: u32) -> Self {
        Self { trim_seconds }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ImageEncodeOptions {
    pub(crate) target_side: u32,
    pub(crate) pad_to_square: bool,
}

#[buildstructor]
impl ImageEncodeOptions {
    #[builder]
    pub(crate) fn new(target_side: u32, #[builder(default)] pad_to_square: bool) -> Self {
        Self { target_side, pad_to_square }
    }
}
