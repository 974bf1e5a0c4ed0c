//! Named entry points for the common reveals.
//!
//! Each wrapper is a shorthand for mounting its catalog entry with default
//! observer settings; it carries no behaviour of its own.

use serde::{Deserialize, Serialize};

use crate::request::AnimationRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wrapper {
    FadeIn,
    FadeInUp,
    FadeInDown,
    FadeInLeft,
    FadeInRight,
    SlideInUp,
    SlideInDown,
    SlideInLeft,
    SlideInRight,
    ScaleIn,
    ScaleInUp,
    CinematicEntrance,
    DramaticReveal,
    HeroEntrance,
    TextReveal,
    StaggerContainer,
}

impl Wrapper {
    pub const ALL: [Wrapper; 16] = [
        Wrapper::FadeIn,
        Wrapper::FadeInUp,
        Wrapper::FadeInDown,
        Wrapper::FadeInLeft,
        Wrapper::FadeInRight,
        Wrapper::SlideInUp,
        Wrapper::SlideInDown,
        Wrapper::SlideInLeft,
        Wrapper::SlideInRight,
        Wrapper::ScaleIn,
        Wrapper::ScaleInUp,
        Wrapper::CinematicEntrance,
        Wrapper::DramaticReveal,
        Wrapper::HeroEntrance,
        Wrapper::TextReveal,
        Wrapper::StaggerContainer,
    ];

    /// Catalog key this wrapper mounts.
    pub fn variant_name(self) -> &'static str {
        match self {
            Wrapper::FadeIn => "fadeIn",
            Wrapper::FadeInUp => "fadeInUp",
            Wrapper::FadeInDown => "fadeInDown",
            Wrapper::FadeInLeft => "fadeInLeft",
            Wrapper::FadeInRight => "fadeInRight",
            Wrapper::SlideInUp => "slideInUp",
            Wrapper::SlideInDown => "slideInDown",
            Wrapper::SlideInLeft => "slideInLeft",
            Wrapper::SlideInRight => "slideInRight",
            Wrapper::ScaleIn => "scaleIn",
            Wrapper::ScaleInUp => "scaleInUp",
            Wrapper::CinematicEntrance => "cinematicEntrance",
            Wrapper::DramaticReveal => "dramaticReveal",
            Wrapper::HeroEntrance => "heroEntrance",
            Wrapper::TextReveal => "textReveal",
            Wrapper::StaggerContainer => "staggerContainer",
        }
    }

    pub fn request(self) -> AnimationRequest {
        AnimationRequest::named(self.variant_name())
    }

    pub fn from_variant_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.variant_name() == name)
    }
}

impl std::fmt::Display for Wrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.variant_name())
    }
}
