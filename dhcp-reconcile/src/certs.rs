use conf_tree_core::ConfigStore;
use serde::Serialize;

/// Certificate metadata exposed by the certificate store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateInfo {
    pub refid: String,
    pub descr: String,
    /// Whether the certificate's purpose includes server authentication.
    pub server_auth: bool,
}

/// Collaborator contract for the appliance certificate store.
pub trait CertificateDirectory {
    /// All certificates known to the store, in store order.
    fn list_certificates(&self) -> Vec<CertificateInfo>;
}

/// Certificates eligible as the HA peer link's server certificate: purpose
/// must include server authentication.
pub fn eligible_server_certs<D: CertificateDirectory>(dir: &D) -> Vec<CertificateInfo> {
    dir.list_certificates()
        .into_iter()
        .filter(|cert| cert.server_auth)
        .collect()
}

/// Certificates eligible as the mutual-TLS client certificate: pure
/// client-auth certificates, purpose excluding server authentication.
pub fn eligible_client_certs<D: CertificateDirectory>(dir: &D) -> Vec<CertificateInfo> {
    dir.list_certificates()
        .into_iter()
        .filter(|cert| !cert.server_auth)
        .collect()
}

/// Certificate directory backed by the configuration document's `cert`
/// entries.
pub struct DocumentCerts<'a, S: ConfigStore> {
    store: &'a S,
}

impl<'a, S: ConfigStore> DocumentCerts<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

impl<S: ConfigStore> CertificateDirectory for DocumentCerts<'_, S> {
    fn list_certificates(&self) -> Vec<CertificateInfo> {
        self.store
            .root()
            .get_children("cert")
            .into_iter()
            .filter_map(|cert| {
                let refid = cert.get_path_text("refid")?.to_string();
                Some(CertificateInfo {
                    descr: cert.get_path_text("descr").unwrap_or(&refid).to_string(),
                    server_auth: cert.get_path_text("type") == Some("server"),
                    refid,
                })
            })
            .collect()
    }
}
