//! Onboarding stage machine.
//!
//! A new user picks style moods, then uploads a first batch of wardrobe
//! photos (or skips). Progress is stored on the user record, so the current
//! stage is always derived from it rather than tracked separately.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{UnknownValue, User};

/// Fewest moods a user must pick before continuing.
pub const MIN_STYLE_MOODS: usize = 5;

/// Style moods offered on the first onboarding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleMood {
    Minimalist,
    Streetwear,
    Vintage,
    Formal,
    Bohemian,
    Athletic,
    Preppy,
    Edgy,
    Romantic,
    Casual,
    Business,
    Grunge,
}

impl StyleMood {
    /// Every mood, in grid order.
    pub const ALL: [Self; 12] = [
        Self::Minimalist,
        Self::Streetwear,
        Self::Vintage,
        Self::Formal,
        Self::Bohemian,
        Self::Athletic,
        Self::Preppy,
        Self::Edgy,
        Self::Romantic,
        Self::Casual,
        Self::Business,
        Self::Grunge,
    ];

    /// Tag stored in the user's style preferences.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimalist => "minimalist",
            Self::Streetwear => "streetwear",
            Self::Vintage => "vintage",
            Self::Formal => "formal",
            Self::Bohemian => "bohemian",
            Self::Athletic => "athletic",
            Self::Preppy => "preppy",
            Self::Edgy => "edgy",
            Self::Romantic => "romantic",
            Self::Casual => "casual",
            Self::Business => "business",
            Self::Grunge => "grunge",
        }
    }

    /// Tile caption.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minimalist => "Minimalist",
            Self::Streetwear => "Streetwear",
            Self::Vintage => "Vintage",
            Self::Formal => "Formal",
            Self::Bohemian => "Bohemian",
            Self::Athletic => "Athletic",
            Self::Preppy => "Preppy",
            Self::Edgy => "Edgy",
            Self::Romantic => "Romantic",
            Self::Casual => "Casual",
            Self::Business => "Business",
            Self::Grunge => "Grunge",
        }
    }
}

impl fmt::Display for StyleMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleMood {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| UnknownValue::new("style mood", s))
    }
}

/// Moods picked so far, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSelection {
    moods: Vec<StyleMood>,
}

impl MoodSelection {
    /// Add the mood if absent, remove it if present.
    pub fn toggle(&mut self, mood: StyleMood) {
        if let Some(pos) = self.moods.iter().position(|m| *m == mood) {
            self.moods.remove(pos);
        } else {
            self.moods.push(mood);
        }
    }

    #[must_use]
    pub fn contains(&self, mood: StyleMood) -> bool {
        self.moods.contains(&mood)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moods.is_empty()
    }

    /// How many more moods are needed before continuing.
    #[must_use]
    pub fn remaining(&self) -> usize {
        MIN_STYLE_MOODS.saturating_sub(self.moods.len())
    }

    #[must_use]
    pub fn can_continue(&self) -> bool {
        self.remaining() == 0
    }

    /// Progress line, e.g. `3 / 5 selected`.
    #[must_use]
    pub fn progress(&self) -> String {
        format!("{} / {MIN_STYLE_MOODS} selected", self.moods.len())
    }

    /// Continue button caption.
    #[must_use]
    pub fn continue_label(&self) -> String {
        match self.remaining() {
            0 => "Continue".to_owned(),
            k => format!("Select {k} more"),
        }
    }

    /// Tags to persist as the user's style preferences.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        self.moods.iter().map(|m| m.as_str().to_owned()).collect()
    }
}

/// Where a user is in onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnboardingStage {
    NeedsStyleSelection,
    NeedsWardrobeUpload,
    Complete,
}

impl OnboardingStage {
    /// Derive the stage from the stored user record.
    ///
    /// Style preferences are checked first: a user without any is sent back
    /// to mood selection even if the completion flag is set.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        if user.style_preferences.is_empty() {
            Self::NeedsStyleSelection
        } else if user.onboarding_completed {
            Self::Complete
        } else {
            Self::NeedsWardrobeUpload
        }
    }

    /// Page path for the stage.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::NeedsStyleSelection => "/onboarding",
            Self::NeedsWardrobeUpload => "/onboarding/upload",
            Self::Complete => "/marketplace",
        }
    }
}

/// Something the user did during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingEvent {
    /// Style moods were saved; carries how many.
    StylesSaved(usize),
    /// Uploaded photos were confirmed.
    WardrobeConfirmed,
    /// The upload step was skipped.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OnboardingError {
    #[error("select at least {MIN_STYLE_MOODS} styles ({selected} selected)")]
    TooFewMoods { selected: usize },

    #[error("{event:?} is not valid while {stage:?}")]
    InvalidTransition {
        stage: OnboardingStage,
        event: OnboardingEvent,
    },
}

/// Advance the stage machine.
///
/// # Errors
///
/// Returns [`OnboardingError::TooFewMoods`] when fewer than
/// [`MIN_STYLE_MOODS`] moods are saved, and
/// [`OnboardingError::InvalidTransition`] for events that do not apply to
/// the current stage.
pub const fn transition(
    stage: OnboardingStage,
    event: OnboardingEvent,
) -> Result<OnboardingStage, OnboardingError> {
    match (stage, event) {
        (OnboardingStage::NeedsStyleSelection, OnboardingEvent::StylesSaved(selected)) => {
            if selected < MIN_STYLE_MOODS {
                Err(OnboardingError::TooFewMoods { selected })
            } else {
                Ok(OnboardingStage::NeedsWardrobeUpload)
            }
        }
        (
            OnboardingStage::NeedsWardrobeUpload,
            OnboardingEvent::WardrobeConfirmed | OnboardingEvent::Skipped,
        ) => Ok(OnboardingStage::Complete),
        (stage, event) => Err(OnboardingError::InvalidTransition { stage, event }),
    }
}
