//! Scenario files.
//!
//! ```toml
//! steps      = 60
//! seed       = 42
//! target     = 1024          # external node id; random if omitted
//! output_dir = "output"
//!
//! [network]
//! nodes = "data/nodes.csv"
//! edges = "data/edges.csv"
//! # pbf = "town.osm.pbf"     # instead of nodes/edges (feature `osm`)
//!
//! [hazard]
//! path = "data/hazard.csv"
//! crs  = "EPSG:4326"
//!
//! [candidates]
//! path = "data/candidates.csv"
//!
//! [render]
//! path = "output/evacuation.mp4"
//! fps  = 10
//! ```
//!
//! Relative paths are resolved against the scenario file's directory.

use std::fmt::Debug;
use std::ops::RangeBounds;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use ev_core::Crs;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Number of steps to run.
    pub steps: u64,
    /// Seed for target choice and activation order; fresh entropy if absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// External id of the target node; uniformly random if absent.
    #[serde(default)]
    pub target: Option<i64>,
    pub output_dir: PathBuf,
    /// Also write `output.db` (needs the `sqlite` feature).
    #[serde(default)]
    pub sqlite: bool,

    pub network:    NetworkSection,
    pub hazard:     GeometrySection,
    pub candidates: GeometrySection,
    #[serde(default)]
    pub render:     Option<RenderSection>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkSection {
    #[serde(default)]
    pub nodes: Option<PathBuf>,
    #[serde(default)]
    pub edges: Option<PathBuf>,
    #[serde(default)]
    pub pbf:   Option<PathBuf>,
}

/// Where the road network comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkSource {
    Csv { nodes: PathBuf, edges: PathBuf },
    Pbf(PathBuf),
}

impl NetworkSection {
    pub fn source(&self) -> Result<NetworkSource> {
        match (&self.nodes, &self.edges, &self.pbf) {
            (Some(nodes), Some(edges), None) => Ok(NetworkSource::Csv {
                nodes: nodes.clone(),
                edges: edges.clone(),
            }),
            (None, None, Some(pbf)) => Ok(NetworkSource::Pbf(pbf.clone())),
            _ => bail!("give either both `nodes` and `edges`, or `pbf`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeometrySection {
    pub path: PathBuf,
    /// EPSG code; the network's frame is assumed if absent.
    #[serde(default)]
    pub crs:  Option<String>,
}

impl GeometrySection {
    pub fn crs(&self) -> Result<Option<Crs>> {
        self.crs
            .as_deref()
            .map(str::parse::<Crs>)
            .transpose()
            .with_context(|| format!("invalid crs for {:?}", self.path))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderSection {
    pub path: PathBuf,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_fps() -> u32 {
    10
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

impl Scenario {
    /// Load and validate a scenario, resolving relative paths.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let text = std::fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        let mut scenario = Self::from_toml(&text).with_context(|| format!("failed to load {file:?}"))?;
        if let Some(base) = file.parent() {
            scenario.resolve_paths(base);
        }
        Ok(scenario)
    }

    /// Parse and validate; paths are left as written.
    pub fn from_toml(text: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(text).context("failed to deserialize scenario")?;
        scenario.validate().context("failed to validate scenario")?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        check_num(self.steps, 1..=1_000_000).context("invalid number of steps")?;
        self.network.source().context("invalid network section")?;
        self.hazard.crs()?;
        self.candidates.crs()?;

        if let Some(render) = &self.render {
            check_num(render.fps, 1..=240).context("invalid frames per second")?;
            check_num(render.width, 16..=7680).context("invalid frame width")?;
            check_num(render.height, 16..=4320).context("invalid frame height")?;
            if render.width % 2 != 0 || render.height % 2 != 0 {
                bail!("frame size must be even, but is {}x{}", render.width, render.height);
            }
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.output_dir);
        for p in [&mut self.network.nodes, &mut self.network.edges, &mut self.network.pbf]
            .into_iter()
            .flatten()
        {
            resolve(p);
        }
        resolve(&mut self.hazard.path);
        resolve(&mut self.candidates.path);
        if let Some(render) = &mut self.render {
            resolve(&mut render.path);
        }
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
