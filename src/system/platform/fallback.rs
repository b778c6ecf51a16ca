use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {}
