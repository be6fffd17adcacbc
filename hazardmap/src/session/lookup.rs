//! Hazard pixel lookups started by a map click.

use tokio_util::sync::CancellationToken;

use crate::coord::LngLat;
use crate::legend::Rgba;
use crate::shelter::ShelterId;
use crate::tile::{PixelSampler, SampleError, SamplePlan, TileFetcher};

/// A hazard lookup waiting for its pixel sample.
///
/// Created by [`MapSession::handle_click`](super::MapSession::handle_click).
/// Run it with [`PendingLookup::run`] and hand the result back to
/// [`MapSession::finish_lookup`](super::MapSession::finish_lookup).
#[derive(Debug, Clone)]
pub struct PendingLookup {
    pub layer_id: String,
    pub position: LngLat,
    pub plan: SamplePlan,
    pub(super) generation: u64,
    pub(super) cancel: CancellationToken,
}

impl PendingLookup {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Token cancelled when a newer lookup or hazard selection supersedes this one.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Samples the planned pixel, resolving early if superseded.
    pub async fn run<F: TileFetcher>(&self, sampler: &PixelSampler<F>) -> Result<Rgba, SampleError> {
        sampler.sample(&self.plan, &self.cancel).await
    }
}

/// Result of a primary click on the map.
#[derive(Debug)]
pub enum ClickOutcome {
    /// A shelter popup was opened.
    Shelter(ShelterId),
    /// A hazard lookup must be sampled and finished.
    Lookup(PendingLookup),
    /// Nothing to show at this point.
    Nothing,
}

/// Result of finishing a hazard lookup.
#[derive(Debug)]
pub enum LookupOutcome {
    /// The hazard popup was opened with this category label.
    Shown { label: String },
    /// A newer click or hazard selection replaced this lookup.
    Superseded,
    /// The pixel is transparent: no hazard data here.
    NoData,
    /// The layer has no usable legend.
    NoLegend,
    /// Fetching or decoding the tile failed.
    Failed(SampleError),
}

/// Map layers whose hover changes the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    Shelter,
    MeasurePoint,
}
