//! Signature and prefix catalogues
//!
//! Simple implementations of the sensitive-API and filtered-library ports,
//! matched on procedure signatures and package prefixes.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::collaborators::{FilteredLibraryCatalog, SensitiveApiCatalog};
use crate::shared::models::Procedure;

/// Sensitive APIs by exact signature or by declaring type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignatureCatalog {
    /// Exact `<Type: name>` signatures
    #[serde(default)]
    signatures: FxHashSet<String>,

    /// Declaring types whose every method is sensitive
    #[serde(default)]
    types: FxHashSet<String>,
}

impl SignatureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_procedure(mut self, procedure: &Procedure) -> Self {
        self.signatures.insert(procedure.signature());
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signatures.insert(signature.into());
        self
    }

    pub fn with_type(mut self, declaring_type: impl Into<String>) -> Self {
        self.types.insert(declaring_type.into());
        self
    }

    /// A small baseline of Android privacy/security sinks
    pub fn android_defaults() -> Self {
        default_sensitive_signatures()
            .into_iter()
            .fold(Self::new(), |catalog, sig| catalog.with_signature(sig))
    }

    pub fn len(&self) -> usize {
        self.signatures.len() + self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SensitiveApiCatalog for SignatureCatalog {
    fn is_sensitive(&self, procedure: &Procedure) -> bool {
        self.types.contains(&procedure.declaring_type)
            || self.signatures.contains(&procedure.signature())
    }
}

/// Filtered libraries by package prefix
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrefixLibraryFilter {
    prefixes: Vec<String>,
}

impl PrefixLibraryFilter {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    /// Framework and widespread vendor namespaces
    pub fn with_defaults() -> Self {
        Self::new(default_filtered_prefixes())
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }
}

impl FilteredLibraryCatalog for PrefixLibraryFilter {
    fn is_filtered(&self, declaring_type: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| declaring_type.starts_with(prefix.as_str()))
    }
}

/// Default sensitive API signatures
pub fn default_sensitive_signatures() -> Vec<String> {
    vec![
        "<android.telephony.SmsManager: sendTextMessage>".to_string(),
        "<android.telephony.SmsManager: sendMultipartTextMessage>".to_string(),
        "<android.telephony.TelephonyManager: getDeviceId>".to_string(),
        "<android.location.LocationManager: getLastKnownLocation>".to_string(),
        "<android.app.admin.DevicePolicyManager: wipeData>".to_string(),
        "<android.app.admin.DevicePolicyManager: lockNow>".to_string(),
        "<android.content.ContentResolver: delete>".to_string(),
        "<java.lang.Runtime: exec>".to_string(),
        "<java.lang.ProcessBuilder: start>".to_string(),
        "<java.net.URL: openConnection>".to_string(),
        "<dalvik.system.DexClassLoader: loadClass>".to_string(),
    ]
}

/// Default filtered package prefixes
pub fn default_filtered_prefixes() -> Vec<String> {
    vec![
        "android.".to_string(),
        "androidx.".to_string(),
        "java.".to_string(),
        "javax.".to_string(),
        "kotlin.".to_string(),
        "kotlinx.".to_string(),
        "com.google.".to_string(),
        "com.facebook.".to_string(),
        "com.squareup.".to_string(),
        "okhttp3.".to_string(),
        "io.reactivex.".to_string(),
        "org.apache.".to_string(),
    ]
}
