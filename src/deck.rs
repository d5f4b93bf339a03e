use std::sync::Arc;

use rand::Rng;

use crate::dataset::{Dataset, Record};
use crate::palette::{ColorPair, PALETTE};

// Cleared on every new card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enhancements {
    pub expanded_prompt: Option<String>,
    pub extra_actions: Vec<String>,
    pub expanding: bool,
    pub generating: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    card: Option<Arc<Record>>,
    flipped: bool,
    colors: ColorPair,
    serial: u64,
    enhancements: Enhancements,
}

impl Selection {
    pub fn card(&self) -> Option<&Arc<Record>> {
        self.card.as_ref()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn colors(&self) -> ColorPair {
        self.colors
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn enhancements(&self) -> &Enhancements {
        &self.enhancements
    }

    pub fn displayed_prompt(&self) -> Option<&str> {
        let card = self.card.as_ref()?;
        Some(
            self.enhancements
                .expanded_prompt
                .as_deref()
                .unwrap_or_else(|| card.prompt()),
        )
    }

    // Avoids the card on screen whenever another identifier exists.
    pub fn select_next<R: Rng>(&self, dataset: &Dataset, rng: &mut R) -> Selection {
        if dataset.is_empty() {
            return self.clone();
        }

        let records = dataset.records();
        let fresh: Vec<&Arc<Record>> = match &self.card {
            Some(previous) => records
                .iter()
                .filter(|r| r.identifier() != previous.identifier())
                .collect(),
            None => records.iter().collect(),
        };
        let pool: Vec<&Arc<Record>> = if fresh.is_empty() {
            records.iter().collect()
        } else {
            fresh
        };

        let card = Arc::clone(pool[rng.random_range(0..pool.len())]);
        let colors = PALETTE[rng.random_range(0..PALETTE.len())];

        Selection {
            card: Some(card),
            flipped: false,
            colors,
            serial: self.serial.wrapping_add(1),
            enhancements: Enhancements::default(),
        }
    }

    pub fn toggle_flip(&self) -> Selection {
        Selection {
            flipped: !self.flipped,
            ..self.clone()
        }
    }

    pub fn start_expanding(&self) -> Option<Selection> {
        if self.card.is_none() || self.enhancements.expanding {
            return None;
        }
        let mut next = self.clone();
        next.enhancements.expanding = true;
        Some(next)
    }

    // `None` means the request failed. Stale serials are ignored.
    pub fn finish_expanding(&self, serial: u64, prompt: Option<String>) -> Selection {
        if serial != self.serial {
            return self.clone();
        }
        let mut next = self.clone();
        next.enhancements.expanding = false;
        if prompt.is_some() {
            next.enhancements.expanded_prompt = prompt;
        }
        next
    }

    pub fn start_generating(&self) -> Option<Selection> {
        if self.card.is_none() || self.enhancements.generating {
            return None;
        }
        let mut next = self.clone();
        next.enhancements.generating = true;
        Some(next)
    }

    pub fn finish_generating(&self, serial: u64, actions: Option<Vec<String>>) -> Selection {
        if serial != self.serial {
            return self.clone();
        }
        let mut next = self.clone();
        next.enhancements.generating = false;
        if let Some(actions) = actions {
            next.enhancements.extra_actions = actions;
        }
        next
    }
}
