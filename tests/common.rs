//! Shared fixtures: a tempdir-backed network tree plus kernels wired to it.
#![allow(dead_code)]

use safenet::kernel::output::Reply;
use safenet::kernel::prompt::Outcome;
use safenet::kernel::registry::SoftwareRegistry;
use safenet::kernel::Kernel;
use safenet::net::Network;
use tempfile::TempDir;

pub const BOOT: &str = "home.safenet";
pub const VAULT: &str = "vault.safenet";

pub struct Fixture {
    tmp: TempDir,
}

impl Fixture {
    /// An empty network tree.
    pub fn new() -> Self {
        Fixture {
            tmp: tempfile::tempdir().unwrap(),
        }
    }

    /// The standard two-server world most suites use: an anonymous-friendly
    /// boot server and a credentialed vault with mail.
    pub fn standard() -> Self {
        let fx = Fixture::new();
        fx.add_server(
            BOOT,
            serde_json::json!({
                "serverAddress": BOOT,
                "serverName": "Conexão do Anhangá",
                "terminalID": "anhanga",
                "iconName": "serpente.png",
                "defaultUser": { "userId": "runner" },
                "year": 2077
            }),
        );
        fx.add_userlist(BOOT, serde_json::json!([{ "userId": "runner" }]));
        fx.add_mailbox(
            BOOT,
            serde_json::json!([
                {
                    "from": "anhanga",
                    "to": ["runner"],
                    "title": "Primeiros passos",
                    "body": "Bem-vindo.  Olhe a caixa."
                }
            ]),
        );
        fx.add_server(
            VAULT,
            serde_json::json!({
                "serverAddress": VAULT,
                "serverName": "Cofre",
                "terminalID": "cofre",
                "iconName": "cofre.png"
            }),
        );
        fx.add_userlist(
            VAULT,
            serde_json::json!([
                { "userId": "neo", "password": "redpill" },
                { "userId": "trinity" }
            ]),
        );
        fx.add_mailbox(
            VAULT,
            serde_json::json!([
                { "from": "morpheus", "to": ["neo"], "title": "Acorde", "body": "Siga o coelho branco." },
                { "from": "smith", "to": ["trinity"], "title": "Proposta", "body": "Não leia isso." },
                { "from": "morpheus", "to": ["neo", "trinity"], "title": "Treino", "body": "Dojo às 5.  Não se atrase." }
            ]),
        );
        fx
    }

    pub fn add_server(&self, address: &str, manifest: serde_json::Value) {
        self.write(address, "manifest.json", &manifest);
    }

    pub fn add_userlist(&self, address: &str, users: serde_json::Value) {
        self.write(address, "userlist.json", &users);
    }

    pub fn add_mailbox(&self, address: &str, mail: serde_json::Value) {
        self.write(address, "mailserver.json", &mail);
    }

    fn write(&self, address: &str, file: &str, value: &serde_json::Value) {
        let dir = self.tmp.path().join(address);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), serde_json::to_vec_pretty(value).unwrap()).unwrap();
    }

    /// A kernel over this network with no softwares installed.
    pub fn kernel(&self) -> Kernel {
        self.kernel_with_softwares(serde_json::json!({}))
    }

    /// A kernel with the given software registry (the JSON shape of
    /// `software.json`).
    pub fn kernel_with_softwares(&self, softwares: serde_json::Value) -> Kernel {
        let entries = serde_json::from_value(softwares).unwrap();
        Kernel::new(
            Network::new(self.tmp.path()),
            SoftwareRegistry::from_entries(entries),
            BOOT,
            "Anhangá",
        )
    }
}

/// Unwrap a completed outcome into its reply.
pub fn done(outcome: Outcome) -> Reply {
    match outcome {
        Outcome::Done(reply) => reply,
        other => panic!("expected a completed command, got {other:?}"),
    }
}

/// Flatten a completed outcome into its display lines.
pub fn lines(outcome: Outcome) -> Vec<String> {
    done(outcome).payload.into_lines().0
}
