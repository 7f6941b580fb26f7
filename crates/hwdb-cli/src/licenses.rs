// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Slurm license and TRES files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hwdb_core::{Database, LicenseSet};
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::info;

fn header() -> Result<String> {
    let stamp = OffsetDateTime::now_utc()
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))?;
    Ok(format!("# file generated on: {stamp}\n\n"))
}

/// Writes the `Licenses=` and `AccountingStorageTRES=` lines of `db`, each
/// behind a generation timestamp.
pub(crate) fn write_files(db: &Database, license_file: &Path, tres_file: &Path) -> Result<()> {
    let set = LicenseSet::from_database(db);
    let header = header()?;
    fs::write(license_file, format!("{header}{}", set.licenses_line()))
        .with_context(|| format!("writing {}", license_file.display()))?;
    fs::write(tres_file, format!("{header}{}", set.tres_line()))
        .with_context(|| format!("writing {}", tres_file.display()))?;
    info!(
        licenses = set.names().len(),
        license_file = %license_file.display(),
        tres_file = %tres_file.display(),
        "wrote slurm license files"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn files_carry_header_and_line() {
        let mut db = Database::new();
        db.load_str("wafer: 10\nsetuptype: cubesetup\nfpgas:\n  - fpga: 0\n    ip: 10.0.10.1\n")
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let licenses = dir.path().join("licenses");
        let tres = dir.path().join("tres");
        write_files(&db, &licenses, &tres).unwrap();

        let text = fs::read_to_string(&licenses).unwrap();
        assert!(text.starts_with("# file generated on: "));
        assert!(text.ends_with("\n\nLicenses=W10F0,W10T8"), "{text}");
        let text = fs::read_to_string(&tres).unwrap();
        assert!(text.ends_with("\n\nAccountingStorageTRES=License/W10F0,License/W10T8"));
    }
}
