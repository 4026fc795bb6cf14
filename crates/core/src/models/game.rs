//! Game state values exchanged with the host

use serde::{Deserialize, Serialize};

/// Score board snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub red: u32,
    pub blue: u32,
    /// Elapsed game time in seconds
    pub time: f64,
    pub score_limit: u32,
    /// Time limit in seconds, 0 for none
    pub time_limit: f64,
}

/// Physical properties of a disc. Unset fields are left untouched by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_gravity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_gravity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_coeff: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inv_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damping: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_mask: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_group: Option<u32>,
}

/// Team uniform
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamColors {
    /// Stripe angle in degrees
    pub angle: u16,
    pub text_color: u32,
    /// Up to three stripe colors
    pub colors: Vec<u32>,
}

/// Font style of an announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnouncementStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    Small,
    SmallBold,
    SmallItalic,
}

/// Notification sound played with an announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementSound {
    None,
    #[default]
    Normal,
    Notification,
}

/// Styled chat line sent by the room itself
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Announcement {
    pub color: Option<u32>,
    #[serde(default)]
    pub style: AnnouncementStyle,
    #[serde(default)]
    pub sound: AnnouncementSound,
}

impl Announcement {
    pub fn colored(color: u32) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: AnnouncementStyle) -> Self {
        self.style = style;
        self
    }
}
