use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

/// Split used when none is given on the command line
pub const DEFAULT_SPLIT: &str = "train=70,test=10,val=20";

const TOTAL_PERCENTAGE: u32 = 100;

/// A dataset split bucket
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "val" | "valid" | "validation" => Ok(Split::Val),
            "test" => Ok(Split::Test),
            other => Err(format!(
                "Unknown split '{}', expected one of train, val, test",
                other
            )),
        }
    }
}

/// Ordered split percentages. The order decides which bucket a random draw lands in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitConfig {
    entries: Vec<(Split, u32)>,
}

impl SplitConfig {
    /// Build a config from `(split, percentage)` pairs, failing unless the percentages sum to 100
    pub fn new(entries: Vec<(Split, u32)>) -> Result<Self, String> {
        for (i, (split, percentage)) in entries.iter().enumerate() {
            if entries[..i].iter().any(|(seen, _)| seen == split) {
                return Err(format!("Split '{}' is given more than once", split));
            }
            if *percentage > TOTAL_PERCENTAGE {
                return Err(format!(
                    "Split '{}' is {}%, more than {}%",
                    split, percentage, TOTAL_PERCENTAGE
                ));
            }
        }

        let total: u32 = entries.iter().map(|(_, percentage)| percentage).sum();
        if total != TOTAL_PERCENTAGE {
            return Err(format!(
                "The sum of split must be {}, got {}",
                TOTAL_PERCENTAGE, total
            ));
        }

        Ok(Self { entries })
    }

    /// Parse a list such as `train=70,val=20,test=10`
    pub fn parse(s: &str) -> Result<Self, String> {
        let mut entries = Vec::new();
        for part in s.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            let (name, percentage) = part
                .split_once('=')
                .ok_or_else(|| format!("Expected NAME=PERCENT, got '{}'", part))?;
            let split = Split::from_str(name)?;
            let percentage = u32::from_str(percentage.trim())
                .map_err(|_| format!("Invalid percentage for '{}': '{}'", name.trim(), percentage))?;
            entries.push((split, percentage));
        }
        Self::new(entries)
    }

    pub fn entries(&self) -> &[(Split, u32)] {
        &self.entries
    }

    /// Every configured split, including those with a zero share
    pub fn splits(&self) -> impl Iterator<Item = Split> + '_ {
        self.entries.iter().map(|(split, _)| *split)
    }

    /// Map a draw in `1..=100` onto the bucket whose cumulative share first reaches it
    pub fn bucket_for(&self, draw: u32) -> Option<Split> {
        let mut current = 0;
        for (split, percentage) in &self.entries {
            current += percentage;
            if draw <= current {
                return Some(*split);
            }
        }
        None
    }
}

/// Seeded random assignment of samples to splits
pub struct SplitSampler {
    config: SplitConfig,
    rng: StdRng,
}

impl SplitSampler {
    pub fn new(config: SplitConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn pick(&mut self) -> Split {
        let draw = self.rng.gen_range(1..=TOTAL_PERCENTAGE);
        // The config sums to 100 so every draw falls into a bucket.
        self.config.bucket_for(draw).unwrap_or(Split::Train)
    }
}
