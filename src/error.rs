use quick_error::quick_error;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    ///
    /// Every structural problem in an input file surfaces as one of these
    /// variants; tolerated anomalies (a track count that does not match the
    /// header, a final track cut off by end-of-data) never do.
    #[derive(Debug)]
    pub enum FormatError {
        /// Track file header without the 'END' terminator.
        MissingHeaderEnd {
            display("Track file header terminator 'END' not found")
        }

        /// A header field the track decoder cannot work without.
        MissingHeaderField(field: &'static str) {
            display("Required track header field '{}' is missing", field)
        }

        /// A required header field that holds no usable integer.
        InvalidHeaderField(field: &'static str) {
            display("Track header field '{}' has no numeric value", field)
        }

        /// Surface document without a data array for the given intent.
        MissingDataArray(intent: &'static str) {
            display("No data array with intent '{}' in GIFTI document", intent)
        }

        /// Label document without any data array at all.
        MissingLabelArray {
            display("No data array in GIFTI label document")
        }

        /// A data array whose Data child is absent or blank.
        EmptyDataArray {
            display("GIFTI data array carries no payload")
        }

        /// A decompressed payload that does not divide into whole elements.
        MisalignedDataArray(len: usize, stride: usize) {
            display("Decompressed payload of {} bytes is not a multiple of {} bytes", len, stride)
        }

        /// Base64 text that does not decode.
        Base64(err: base64::DecodeError) {
            from()
            display("Invalid base64 payload: {}", err)
            source(err)
        }

        /// A compressed payload the zlib stream decoder rejects.
        Inflate(err: IOError) {
            display("Could not inflate compressed payload: {}", err)
            source(err)
        }

        /// XML the GIFTI reader cannot parse.
        Xml(err: quick_xml::Error) {
            from()
            display("Malformed GIFTI document: {}", err)
            source(err)
        }

        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, FormatError>;
