use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::errors::RegionSetError;
use crate::models::Region;
use crate::utils::get_dynamic_reader;

///
/// RegionSet struct, the representation of an interval restriction file,
/// such as a bed file.
///
#[derive(Clone, Debug, Default)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    pub header: Option<String>,
    pub path: Option<PathBuf>,
}

pub struct RegionSetIterator<'a> {
    region_set: &'a RegionSet,
    index: usize,
}

impl TryFrom<&Path> for RegionSet {
    type Error = RegionSetError;

    ///
    /// Create a new [RegionSet] from a bed file (optionally gzipped).
    ///
    /// # Arguments:
    /// - value: path to bed file on disk.
    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        let path = value;

        if !path.is_file() {
            return Err(RegionSetError::FileReadError(path.display().to_string()));
        }
        let reader = get_dynamic_reader(path)?;

        let mut regions: Vec<Region> = Vec::new();
        let mut header: String = String::new();
        let mut first_line: bool = true;

        for line in reader.lines() {
            let line = line?;

            if line.trim().is_empty()
                || line.starts_with("browser")
                || line.starts_with("track")
                || line.starts_with('#')
            {
                if !line.trim().is_empty() {
                    header.push_str(&line);
                }
                continue;
            }

            let parts: Vec<&str> = line.split('\t').collect();

            // column headers like `chr start end` without a leading #
            if first_line {
                first_line = false;
                if parts.len() >= 3 && parts[1].parse::<u32>().is_err() {
                    header.push_str(&line);
                    continue;
                }
            }

            let bad_line = || RegionSetError::BadBedLine {
                path: path.display().to_string(),
                line: line.clone(),
            };

            if parts.len() < 3 {
                return Err(bad_line());
            }

            let start = parts[1].trim().parse::<u32>().map_err(|_| bad_line())?;
            let end = parts[2].trim().parse::<u32>().map_err(|_| bad_line())?;

            regions.push(Region {
                chr: parts[0].to_owned(),
                start,
                end,
            });
        }

        Ok(RegionSet {
            regions,
            header: if header.is_empty() {
                None
            } else {
                Some(header)
            },
            path: Some(path.to_owned()),
        })
    }
}

impl TryFrom<&str> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        RegionSet::try_from(Path::new(value))
    }
}

impl TryFrom<PathBuf> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: PathBuf) -> Result<Self, Self::Error> {
        RegionSet::try_from(value.as_path())
    }
}

impl From<Vec<Region>> for RegionSet {
    fn from(regions: Vec<Region>) -> Self {
        RegionSet {
            regions,
            header: None,
            path: None,
        }
    }
}

impl<'a> Iterator for RegionSetIterator<'a> {
    type Item = &'a Region;

    fn next(&mut self) -> Option<Self::Item> {
        let region = self.region_set.regions.get(self.index)?;
        self.index += 1;
        Some(region)
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = RegionSetIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        RegionSetIterator {
            region_set: self,
            index: 0,
        }
    }
}

impl RegionSet {
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Distinct chromosome names, sorted
    pub fn chromosomes(&self) -> BTreeSet<&str> {
        self.regions.iter().map(|r| r.chr.as_str()).collect()
    }
}
