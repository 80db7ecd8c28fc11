//! Reading parts out of Office Open XML packages (.xlsx, .docx).

use std::io::{Cursor, Read};

use quick_xml::events::BytesStart;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::model::SourceKind;

/// An opened OOXML package.
pub(crate) struct Package<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
    kind: SourceKind,
}

impl<'a> Package<'a> {
    /// Open a package from bytes. Errors are reported against `kind`.
    pub(crate) fn open(data: &'a [u8], kind: SourceKind) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| Error::parse(kind, format!("not a valid package: {}", e)))?;
        Ok(Self { archive, kind })
    }

    /// Read a part by name; `None` if the package has no such part.
    pub(crate) fn part(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let name = name.trim_start_matches('/');
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(Error::parse(self.kind, e)),
        };

        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)
            .map_err(|e| Error::parse(self.kind, format!("{}: {}", name, e)))?;
        Ok(Some(data))
    }

    /// Read a part that must exist.
    pub(crate) fn required_part(&mut self, name: &str) -> Result<Vec<u8>> {
        self.part(name)?
            .ok_or_else(|| Error::parse(self.kind, format!("missing part {}", name)))
    }
}

/// Value of the attribute with the given local name, unescaped.
pub(crate) fn attribute(element: &BytesStart<'_>, local_name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local_name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}
