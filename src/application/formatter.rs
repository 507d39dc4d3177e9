use crate::application::dto::FormatSpec;
use crate::application::factories::{Encoder, FormatRegistry};
use crate::sbom_generation::domain::Sbom;
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;

impl Sbom {
    /// Resolves every requested format against this SBOM
    ///
    /// All specs are parsed and resolved before anything is encoded; the
    /// first failure aborts the call and no outputs are returned. Encoding
    /// itself is deferred until an output is read or written.
    ///
    /// # Errors
    /// - [`SbomError::MalformedFormatSpec`] for unparseable spec strings
    /// - [`SbomError::UnsupportedFormat`] / [`SbomError::UnsupportedVersion`]
    ///   for specs the registry cannot serve
    ///
    /// # Examples
    /// ```
    /// use sbom_export::prelude::*;
    /// use std::io::Read;
    ///
    /// let dependency = DependencyDescriptor {
    ///     name: "Go".to_string(),
    ///     version: "1.16.9".to_string(),
    ///     ..Default::default()
    /// };
    /// let sbom = SbomGenerator::generate_from_dependency(&dependency, "some-path").unwrap();
    ///
    /// let formatter = sbom.in_formats(["application/vnd.cyclonedx+json;version=1.4"]).unwrap();
    /// let mut output = formatter.into_formats().remove(0);
    /// assert_eq!(output.extension(), "cdx.json");
    ///
    /// let mut content = String::new();
    /// output.read_to_string(&mut content).unwrap();
    /// assert!(content.contains("\"specVersion\": \"1.4\""));
    /// ```
    pub fn in_formats<I, S>(self, specs: I) -> Result<Formatter>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let encoders = specs
            .into_iter()
            .map(|raw| FormatSpec::parse(raw.as_ref()).and_then(|s| FormatRegistry::resolve(&s)))
            .collect::<Result<Vec<Encoder>>>()?;

        let sbom = Arc::new(self);
        let outputs = encoders
            .into_iter()
            .map(|encoder| ResolvedFormat::new(encoder, Arc::clone(&sbom)))
            .collect();

        Ok(Formatter { outputs })
    }
}

/// Resolved outputs of one `in_formats` call, in request order
#[derive(Debug)]
pub struct Formatter {
    outputs: Vec<ResolvedFormat>,
}

impl Formatter {
    pub fn formats(&self) -> &[ResolvedFormat] {
        &self.outputs
    }

    pub fn formats_mut(&mut self) -> &mut [ResolvedFormat] {
        &mut self.outputs
    }

    pub fn into_formats(self) -> Vec<ResolvedFormat> {
        self.outputs
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// First extension shared by two or more outputs, if any
    ///
    /// Versions of one format share an extension, so such outputs cannot
    /// be written side by side under a single file stem.
    pub fn repeated_extension(&self) -> Option<&'static str> {
        self.outputs.iter().enumerate().find_map(|(index, output)| {
            self.outputs[..index]
                .iter()
                .any(|earlier| earlier.extension() == output.extension())
                .then(|| output.extension())
        })
    }
}

impl IntoIterator for Formatter {
    type Item = ResolvedFormat;
    type IntoIter = std::vec::IntoIter<ResolvedFormat>;

    fn into_iter(self) -> Self::IntoIter {
        self.outputs.into_iter()
    }
}

/// One encoded output: a fixed extension plus a readable byte stream
///
/// Reading encodes the document once into memory on the first call;
/// [`ResolvedFormat::write_to`] streams straight into a caller's writer.
#[derive(Debug)]
pub struct ResolvedFormat {
    encoder: Encoder,
    sbom: Arc<Sbom>,
    content: Option<Cursor<Vec<u8>>>,
}

impl ResolvedFormat {
    fn new(encoder: Encoder, sbom: Arc<Sbom>) -> Self {
        Self {
            encoder,
            sbom,
            content: None,
        }
    }

    /// Registered format name, e.g. `application/spdx+json`
    pub fn format(&self) -> &'static str {
        self.encoder.format
    }

    /// Resolved schema version
    pub fn version(&self) -> &'static str {
        self.encoder.version
    }

    /// File extension without a leading dot, e.g. `spdx.json`
    pub fn extension(&self) -> &'static str {
        self.encoder.extension
    }

    /// Encodes the document into `writer`
    ///
    /// # Errors
    /// Returns [`SbomError::EncodingIo`] when the writer fails.
    pub fn write_to(&self, writer: &mut dyn Write) -> Result<()> {
        (self.encoder.encode)(&self.sbom, writer).map_err(|source| self.encoding_error(source))?;
        Ok(())
    }

    /// Encodes the document into a new buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }

    fn encoding_error(&self, source: io::Error) -> SbomError {
        SbomError::EncodingIo {
            format: self.encoder.format.to_string(),
            version: self.encoder.version.to_string(),
            source,
        }
    }
}

impl Read for ResolvedFormat {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.content.is_none() {
            let mut buffer = Vec::new();
            (self.encoder.encode)(&self.sbom, &mut buffer)
                .map_err(|source| io::Error::new(source.kind(), self.encoding_error(source)))?;
            self.content = Some(Cursor::new(buffer));
        }

        match self.content.as_mut() {
            Some(content) => content.read(buf),
            None => Ok(0),
        }
    }
}
