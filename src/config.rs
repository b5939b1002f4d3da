//! Configuration utilities.

use crate::viewport::PathStyle;
use clap::builder;
use clap::error::ErrorKind;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Loads a path style override from a JSON file.
///
/// Missing fields keep their default value, so a file overriding only the
/// stroke color is valid.
fn load_style(path: &Path) -> anyhow::Result<PathStyle> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Clap value parser turning a file-path argument into a [`PathStyle`].
#[derive(Clone)]
pub struct PathStyleParser;

impl builder::TypedValueParser for PathStyleParser {
    type Value = PathStyle;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        _arg: Option<&clap::Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let path = Path::new(value);
        load_style(path).map_err(|e| {
            let msg = format!("Invalid style file {}: {e}\n", path.display());
            clap::Error::raw(ErrorKind::InvalidValue, msg).with_cmd(cmd)
        })
    }
}

impl builder::ValueParserFactory for PathStyle {
    type Parser = PathStyleParser;

    fn value_parser() -> Self::Parser {
        PathStyleParser
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::builder::TypedValueParser;
    use std::io::Write;

    fn temp_style_file(contents: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "fitmap-style-{}-{contents_len}.json",
            std::process::id(),
            contents_len = contents.len()
        ));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn parses_partial_style_override() {
        let path = temp_style_file(br##"{"stroke_color": "#00FF00", "stroke_weight": 4}"##);
        let style = PathStyleParser
            .parse_ref(&clap::Command::new("test"), None, path.as_os_str())
            .unwrap();
        assert_eq!(style.stroke_color, "#00FF00");
        assert_eq!(style.stroke_weight, 4);
        assert_eq!(style.stroke_opacity, 1.0);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_style_file_is_an_argument_error() {
        let result = PathStyleParser.parse_ref(
            &clap::Command::new("test"),
            None,
            OsStr::new("/nonexistent/style.json"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn malformed_style_file_is_an_argument_error() {
        let path = temp_style_file(b"not json");
        let result =
            PathStyleParser.parse_ref(&clap::Command::new("test"), None, path.as_os_str());
        assert!(result.is_err());
        std::fs::remove_file(path).unwrap();
    }
}
