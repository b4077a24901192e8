use std::fmt::{self, Display};
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::errors::RegionSetError;
use crate::models::Region;
use crate::utils::get_dynamic_reader;

///
/// RegionSet struct, the representation of a candidate regions table
/// (`chrom`, `start`, `end`, ...). Rows keep their file order.
///
#[derive(Clone, Debug, Default)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    pub header: Option<String>,
    pub path: Option<PathBuf>,
}

fn parse_coordinate(value: Option<&&str>, what: &str, line: &str) -> Result<u32, RegionSetError> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .ok_or_else(|| {
            RegionSetError::RegionParseError(format!("Error in parsing {} position: {:?}", what, line))
        })
}

impl TryFrom<&Path> for RegionSet {
    type Error = RegionSetError;

    ///
    /// Create a new [RegionSet] from a bed-like file.
    ///
    /// # Arguments:
    /// - value: path to a (optionally gzipped) tab-delimited file on disk.
    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        let path = value;

        let reader = get_dynamic_reader(path)
            .map_err(|e| RegionSetError::FileReadError(format!("{}: {}", path.display(), e)))?;

        let mut new_regions: Vec<Region> = Vec::new();
        let mut header: String = String::new();
        let mut first_line: bool = true;

        for line in reader.lines() {
            let string_line = line?;

            if string_line.trim().is_empty() {
                continue;
            }

            if string_line.starts_with("browser")
                | string_line.starts_with("track")
                | string_line.starts_with('#')
            {
                header.push_str(&string_line);
                continue;
            }

            let parts: Vec<&str> = string_line.split('\t').collect();

            // Handling a column header like `chrom start end` without #, on the first non-comment line
            if first_line {
                first_line = false;
                if parts.len() >= 3 && parts[1].trim().parse::<u32>().is_err() {
                    header.push_str(&string_line);
                    continue;
                }
            }

            new_regions.push(Region {
                chr: parts[0].to_owned(),
                start: parse_coordinate(parts.get(1), "start", &string_line)?,
                end: parse_coordinate(parts.get(2), "end", &string_line)?,
                rest: parts
                    .get(3..)
                    .map(|rest| rest.join("\t"))
                    .filter(|s| !s.is_empty()),
            });
        }

        if new_regions.is_empty() {
            return Err(RegionSetError::EmptyRegionSet(path.display().to_string()));
        }

        Ok(RegionSet {
            regions: new_regions,
            header: match header.is_empty() {
                true => None,
                false => Some(header),
            },
            path: Some(value.to_owned()),
        })
    }
}

impl TryFrom<&str> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        RegionSet::try_from(Path::new(value))
    }
}

impl TryFrom<String> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RegionSet::try_from(Path::new(&value))
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

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

impl RegionSet {
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }
}

impl Display for RegionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionSet with {} regions.", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;

    fn get_test_path(file_name: &str) -> PathBuf {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data/regionset")
            .join(file_name)
    }

    fn write_temp(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("regions.bed");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (tempdir, path)
    }

    #[rstest]
    fn test_open_from_path() {
        let region_set = RegionSet::try_from(get_test_path("candidates.bed")).unwrap();
        assert_eq!(region_set.len(), 6);
        assert_eq!(region_set.regions[0], Region::new("1", 1000, 2000));
    }

    #[rstest]
    fn test_keeps_file_order() {
        let (_dir, path) = write_temp("chr2\t50\t60\nchr1\t10\t20\n");
        let region_set = RegionSet::try_from(path.as_path()).unwrap();
        let chroms: Vec<&str> = region_set.iter().map(|r| r.chr.as_str()).collect();
        assert_eq!(chroms, vec!["chr2", "chr1"]);
    }

    #[rstest]
    fn test_header_and_comments_are_skipped() {
        let (_dir, path) = write_temp("# generated\nchrom\tstart\tend\nchr1\t10\t20\tname\n");
        let region_set = RegionSet::try_from(path.as_path()).unwrap();
        assert_eq!(region_set.len(), 1);
        assert_eq!(region_set.regions[0].rest, Some("name".to_string()));
        assert_eq!(
            region_set.header,
            Some("# generatedchrom\tstart\tend".to_string())
        );
    }

    #[rstest]
    fn test_bad_coordinate_is_error() {
        let (_dir, path) = write_temp("chr1\t10\t20\nchr1\tten\t20\n");
        let result = RegionSet::try_from(path.as_path());
        assert!(matches!(result, Err(RegionSetError::RegionParseError(_))));
    }

    #[rstest]
    fn test_empty_file_is_error() {
        let (_dir, path) = write_temp("# nothing here\n");
        let result = RegionSet::try_from(path.as_path());
        assert!(matches!(result, Err(RegionSetError::EmptyRegionSet(_))));
    }

    #[rstest]
    fn test_missing_file_is_error() {
        let result = RegionSet::try_from("tests/data/missing.bed");
        assert!(matches!(result, Err(RegionSetError::FileReadError(_))));
    }
}
