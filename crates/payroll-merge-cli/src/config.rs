use anyhow::Result;
use payroll_merge::locate::latest_file;
use payroll_merge::{
    CellValue, Diagnostics, MergeJob, NameMatching, PayrollError, RosterLayout, SourceFile,
    SourceLayout, TargetFile,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where to look for the newest copy of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSearch {
    pub name_keyword: String,
    pub extension: String,
    /// Defaults to the directory of the config file. `~` is expanded and
    /// relative paths are resolved against the config file's directory.
    pub dir: Option<PathBuf>,
}

impl FileSearch {
    pub fn directory(&self, base_dir: &Path) -> PathBuf {
        match &self.dir {
            None => base_dir.to_owned(),
            Some(dir) => {
                let expanded = PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).as_ref());
                if expanded.is_absolute() {
                    expanded
                } else {
                    base_dir.join(expanded)
                }
            }
        }
    }

    pub fn find(&self, base_dir: &Path) -> Result<PathBuf> {
        latest_file(&self.directory(base_dir), &self.name_keyword, &self.extension)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CompanyId {
    Number(i64),
    Text(String),
}

impl From<&CompanyId> for CellValue {
    fn from(id: &CompanyId) -> Self {
        match id {
            CompanyId::Number(n) => CellValue::from(*n),
            CompanyId::Text(text) => CellValue::from(text.as_str()),
        }
    }
}

fn default_company_id() -> CompanyId {
    CompanyId::Number(28)
}

fn default_first_name_col() -> usize {
    RosterLayout::default().first_name_col
}

fn default_last_name_col() -> usize {
    RosterLayout::default().last_name_col
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigTarget {
    pub name_keyword: String,
    pub extension: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// 0-based index of the roster sheet. The sheet that was active when the
    /// workbook was last saved is not considered, so set this when the roster
    /// is not the first sheet.
    #[serde(default)]
    pub sheet: usize,
    #[serde(default = "default_company_id")]
    pub company_id: CompanyId,
    #[serde(default)]
    pub company_id_col: usize,
    #[serde(default = "default_first_name_col")]
    pub first_name_col: usize,
    #[serde(default = "default_last_name_col")]
    pub last_name_col: usize,
    #[serde(default)]
    pub name_matching: NameMatching,
    /// Open the workbook in its default application after saving.
    #[serde(default)]
    pub open_when_done: bool,
}

impl ConfigTarget {
    pub fn search(&self) -> FileSearch {
        FileSearch {
            name_keyword: self.name_keyword.clone(),
            extension: self.extension.clone(),
            dir: self.dir.clone(),
        }
    }

    pub fn layout(&self) -> RosterLayout {
        RosterLayout {
            company_id: CellValue::from(&self.company_id),
            company_id_col: self.company_id_col,
            first_name_col: self.first_name_col,
            last_name_col: self.last_name_col,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(try_from = "RawConfigSource")]
pub struct ConfigSource {
    pub name: String,
    pub search: FileSearch,
    /// Unread sources are still located, so a missing download is noticed.
    pub read: bool,
    pub roster: bool,
    pub layout: SourceLayout,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfigSource {
    name: String,
    name_keyword: String,
    extension: String,
    #[serde(default)]
    dir: Option<PathBuf>,
    #[serde(default = "default_true")]
    read: bool,
    #[serde(default)]
    roster: bool,
    #[serde(default)]
    sheet: usize,
    #[serde(default)]
    name_col: usize,
    #[serde(default)]
    data_cols: Vec<usize>,
    #[serde(default)]
    target_cols: Vec<usize>,
}

impl TryFrom<RawConfigSource> for ConfigSource {
    type Error = String;

    fn try_from(raw: RawConfigSource) -> Result<Self, Self::Error> {
        if raw.read && raw.data_cols.len() != raw.target_cols.len() {
            return Err(format!(
                "source '{}' has {} data_cols but {} target_cols",
                raw.name,
                raw.data_cols.len(),
                raw.target_cols.len()
            ));
        }
        if raw.roster && !raw.read {
            return Err(format!(
                "source '{}' is the roster source and must be read",
                raw.name
            ));
        }
        Ok(ConfigSource {
            name: raw.name,
            search: FileSearch {
                name_keyword: raw.name_keyword,
                extension: raw.extension,
                dir: raw.dir,
            },
            read: raw.read,
            roster: raw.roster,
            layout: SourceLayout {
                sheet: raw.sheet,
                name_col: raw.name_col,
                data_cols: raw.data_cols,
                target_cols: raw.target_cols,
            },
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDebug {
    /// Print the diagnostic snapshot after every run.
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub target: ConfigTarget,
    #[serde(rename = "source")]
    pub sources: Vec<ConfigSource>,
    #[serde(default)]
    pub debug: ConfigDebug,
}

impl Config {
    pub fn parse(contents: &str) -> Result<Self, String> {
        let config: Config = toml::from_str(contents).map_err(|err| err.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.sources.is_empty() {
            return Err("at least one [[source]] is required".to_string());
        }
        for (i, source) in self.sources.iter().enumerate() {
            if self.sources[..i].iter().any(|other| other.name == source.name) {
                return Err(format!("source '{}' is defined twice", source.name));
            }
        }
        match self.sources.iter().filter(|source| source.roster).count() {
            1 => Ok(()),
            0 => Err("one source must be marked with 'roster = true'".to_string()),
            _ => Err("only one source can be marked with 'roster = true'".to_string()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<(PathBuf, Self)> {
        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_owned(),
            _ => PathBuf::from("."),
        };
        let config_error = |message: String| PayrollError::Config {
            path: path.to_owned(),
            message,
        };

        let contents =
            std::fs::read_to_string(path).map_err(|err| config_error(err.to_string()))?;
        let config = Config::parse(&contents).map_err(config_error)?;

        Ok((base_dir, config))
    }

    /// First config file in the current directory.
    pub fn find() -> Option<&'static Path> {
        [
            Path::new("payroll-merge.toml"),
            Path::new(".payroll-merge.toml"),
        ]
        .into_iter()
        .find(|location| location.exists())
    }

    /// Locate the target and every source, including unread ones.
    pub fn merge_job(&self, base_dir: &Path, diagnostics: &mut Diagnostics) -> Result<MergeJob> {
        let target = self.target.search().find(base_dir)?;
        diagnostics.target = Some(target.clone());

        let mut sources = Vec::new();
        for source in &self.sources {
            let path = source.search.find(base_dir)?;
            let entry = diagnostics.source(&source.name);
            entry.file = Some(path.clone());
            entry.read = source.read;

            if !source.read {
                tracing::info!(source = %source.name, "located, not read");
                continue;
            }
            sources.push(SourceFile {
                name: source.name.clone(),
                path,
                layout: source.layout.clone(),
                roster: source.roster,
            });
        }

        Ok(MergeJob {
            target: TargetFile {
                path: target,
                sheet: self.target.sheet,
                layout: self.target.layout(),
            },
            sources,
            matching: self.target.name_matching,
        })
    }
}
