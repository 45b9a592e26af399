use simple_error::{SimpleResult, bail};

/// Check a required input filename
///
/// Assumes no logger has been configured yet
///
pub fn check_required_filename(filename: &str, label: &str) -> SimpleResult<()> {
    if filename.is_empty() {
        bail!("Must specify {label} file");
    }
    let path = std::path::Path::new(&filename);
    if !path.exists() {
        bail!("Can't find specified {label} file: '{filename}'");
    }
    if !path.is_file() {
        bail!("Specified {label} file path does not appear to be a file: '{filename}'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_required_filename() {
        assert!(check_required_filename("", "segment").is_err());
        assert!(check_required_filename("./no_such_dir/not_there.tsv", "segment").is_err());
        assert!(check_required_filename("Cargo.toml", "segment").is_ok());
        assert!(check_required_filename("src", "segment").is_err());
    }
}
