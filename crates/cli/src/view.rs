use tabled::Tabled;
use unitloader_api::ContentLocation;

#[derive(Tabled)]
pub struct LocationView {
    pub kind: &'static str,
    pub location: String,
}

impl LocationView {
    pub fn from_location(location: &ContentLocation) -> Self {
        let kind = if location.is_archive() {
            "archive"
        } else {
            "directory"
        };
        Self {
            kind,
            location: location.uri().to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct ScopeView {
    pub order: usize,
    pub scope: String,
}
