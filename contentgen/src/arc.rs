use std::collections::BTreeMap;

use lessonmark::{Lesson, ScreenBody, ScreenKind};
use serde::Serialize;

use crate::error::{GenerateError, Result};

/// The four narrative stages every module introduces with an arc lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArcZone {
    Trezire,
    PrimeleCiocniri,
    Profunzime,
    Maestrie,
}

impl ArcZone {
    pub const ALL: [ArcZone; 4] = [
        ArcZone::Trezire,
        ArcZone::PrimeleCiocniri,
        ArcZone::Profunzime,
        ArcZone::Maestrie,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ArcZone::Trezire => "trezire",
            ArcZone::PrimeleCiocniri => "primele_ciocniri",
            ArcZone::Profunzime => "profunzime",
            ArcZone::Maestrie => "maestrie",
        }
    }

    /// Resolve the zone an arc lesson id ends with. The longest matching key
    /// wins, so a key that is a suffix of another cannot shadow it.
    pub fn from_suffix(text: &str) -> Option<ArcZone> {
        ArcZone::ALL
            .into_iter()
            .filter(|zone| text.ends_with(zone.key()))
            .max_by_key(|zone| zone.key().len())
    }
}

/// Title and body of a module's arc introduction for one zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcIntro {
    /// Id of the lesson the intro was taken from.
    pub id: String,
    pub title: String,
    pub body: String,
}

impl ArcIntro {
    /// Take the first `arcintro` screen of a lesson.
    pub fn from_lesson(lesson: &Lesson) -> Option<ArcIntro> {
        match &lesson.first_screen(ScreenKind::ArcIntro)?.body {
            ScreenBody::ArcIntro { title, body } => Some(ArcIntro {
                id: lesson.lesson_id.clone(),
                title: title.clone(),
                body: body.clone(),
            }),
            _ => None,
        }
    }
}

/// Exactly one intro per zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcIntroGroup {
    pub trezire: ArcIntro,
    pub primele_ciocniri: ArcIntro,
    pub profunzime: ArcIntro,
    pub maestrie: ArcIntro,
}

impl ArcIntroGroup {
    /// Fails with every missing zone when the map is incomplete.
    pub fn from_zones(module: &str, mut zones: BTreeMap<ArcZone, ArcIntro>) -> Result<Self> {
        let missing: Vec<&'static str> = ArcZone::ALL
            .into_iter()
            .filter(|zone| !zones.contains_key(zone))
            .map(ArcZone::key)
            .collect();
        let mut take = |zone| zones.remove(&zone);
        match (
            take(ArcZone::Trezire),
            take(ArcZone::PrimeleCiocniri),
            take(ArcZone::Profunzime),
            take(ArcZone::Maestrie),
        ) {
            (Some(trezire), Some(primele_ciocniri), Some(profunzime), Some(maestrie)) => {
                Ok(ArcIntroGroup {
                    trezire,
                    primele_ciocniri,
                    profunzime,
                    maestrie,
                })
            }
            _ => Err(GenerateError::MissingArcZones {
                module: module.to_string(),
                zones: missing,
            }),
        }
    }

    pub fn get(&self, zone: ArcZone) -> &ArcIntro {
        match zone {
            ArcZone::Trezire => &self.trezire,
            ArcZone::PrimeleCiocniri => &self.primele_ciocniri,
            ArcZone::Profunzime => &self.profunzime,
            ArcZone::Maestrie => &self.maestrie,
        }
    }
}
