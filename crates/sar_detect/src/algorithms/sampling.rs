use rand::{seq::index, Rng, RngCore};

use crate::{
    params::{Caps, TaggingParams},
    traits::{DetectionSampler, VesselTagger},
    types::{DetectionSet, VesselTags},
};

/// Keep at most `cap` items, drawn uniformly without replacement.
///
/// Lists already within the cap are returned untouched and consume no
/// randomness. The kept subset follows draw order, not input order.
pub fn subsample<T: Clone, R: Rng + ?Sized>(items: Vec<T>, cap: usize, rng: &mut R) -> Vec<T> {
    if items.len() <= cap {
        return items;
    }
    index::sample(rng, items.len(), cap)
        .into_iter()
        .map(|i| items[i].clone())
        .collect()
}

/// Uniform per-category sampler (vessels, then tanks, then piers).
#[derive(Debug, Clone, Default)]
pub struct UniformSampler;

impl DetectionSampler for UniformSampler {
    fn sample(&self, detections: DetectionSet, caps: &Caps, rng: &mut dyn RngCore) -> DetectionSet {
        DetectionSet {
            vessels: subsample(detections.vessels, caps.vessels, rng),
            tanks: subsample(detections.tanks, caps.tanks, rng),
            piers: subsample(detections.piers, caps.piers, rng),
        }
    }
}

/// Draws the dark (no AIS) subset, then the moving subset from the
/// remaining vessels.
#[derive(Debug, Clone, Default)]
pub struct RandomVesselTagger;

impl VesselTagger for RandomVesselTagger {
    fn tag(
        &self,
        vessel_count: usize,
        params: &TaggingParams,
        rng: &mut dyn RngCore,
    ) -> VesselTags {
        let r: f32 = rng.r#gen();
        let dark_ratio = params.dark_base_ratio + params.dark_ratio_spread * r;
        let dark_len = ((vessel_count as f32 * dark_ratio) as usize).min(vessel_count);
        let dark = index::sample(rng, vessel_count, dark_len).into_vec();

        let remaining: Vec<usize> = (0..vessel_count).filter(|i| !dark.contains(i)).collect();
        let moving_len = params.moving_cap.min(remaining.len());
        let moving = index::sample(rng, remaining.len(), moving_len)
            .into_iter()
            .map(|i| remaining[i])
            .collect();

        VesselTags {
            dark_ratio,
            dark,
            moving,
        }
    }
}
