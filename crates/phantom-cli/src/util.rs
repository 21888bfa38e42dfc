use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use phantom_engine::BoardConfig;

/// Destination for command output: stdout, or a file when a path is given.
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = match output_path {
            Some(path) => Output::create(path)?,
            None => Output::stdout(),
        };
        output.write_json(value)
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .and_then(|()| self.flush())
            .with_context(|| format!("Failed to finish output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))?;

    Ok(value)
}

/// Reads a [`BoardConfig`]. Missing fields keep their defaults.
pub fn read_board_config_file<P>(path: P) -> anyhow::Result<BoardConfig>
where
    P: AsRef<Path>,
{
    read_json_file("board config", path)
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("phantom-{}-{name}", process::id()))
    }

    #[test]
    fn test_config_roundtrip_through_file() {
        let path = temp_path("config.json");
        let config = BoardConfig {
            width: 5,
            spawn_delay: 0.25,
            ..BoardConfig::default()
        };
        Output::save_json(&config, Some(&path)).unwrap();
        let restored = read_board_config_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let path = temp_path("partial.json");
        fs::write(&path, r#"{ "height": 4, "match_threshold": 4 }"#).unwrap();
        let config = read_board_config_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.height, 4);
        assert_eq!(config.match_threshold, 4);
        assert_eq!(config.width, BoardConfig::default().width);
    }

    #[test]
    fn test_malformed_config_names_the_file() {
        let path = temp_path("broken.json");
        fs::write(&path, "{ width: ").unwrap();
        let err = read_board_config_file(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("Failed to parse board config JSON file"));
    }
}
