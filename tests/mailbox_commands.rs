//! `caixa` and `ler`: filtered views, fresh indices, bounds.

mod common;

use common::{lines, Fixture, VAULT};
use safenet::errors::TermError;

async fn kernel_as(user: &str, pass: &str) -> (Fixture, safenet::kernel::Kernel) {
    let fx = Fixture::standard();
    let mut kernel = fx.kernel();
    kernel.boot().await.unwrap();
    kernel
        .exec_line(&format!("conectar {user}:{pass}@{VAULT}"))
        .await
        .unwrap();
    (fx, kernel)
}

#[tokio::test]
async fn caixa_lists_only_mail_addressed_to_the_current_user() {
    let (_fx, mut kernel) = kernel_as("neo", "redpill").await;
    let out = lines(kernel.exec_line("caixa").await.unwrap());
    // Two of the three vault messages reach neo, in mail-list order.
    assert_eq!(out, vec!["[0] Acorde", "[1] Treino"]);
}

#[tokio::test]
async fn caixa_fails_when_nothing_is_addressed_to_you() {
    let fx = Fixture::standard();
    fx.add_mailbox(VAULT, serde_json::json!([]));
    let mut kernel = fx.kernel();
    kernel.boot().await.unwrap();
    kernel
        .exec_line(&format!("conectar trinity@{VAULT}"))
        .await
        .unwrap();
    let err = kernel.exec_line("caixa").await.unwrap_err();
    assert_eq!(err, TermError::MailboxEmpty);
}

#[tokio::test]
async fn ler_uses_filtered_indices() {
    let (_fx, mut kernel) = kernel_as("neo", "redpill").await;
    // Index 1 in neo's filtered view is "Treino", not trinity's "Proposta".
    let out = lines(kernel.exec_line("ler 1").await.unwrap());
    assert!(out.iter().any(|l| l == "From: morpheus"));
    assert!(out.iter().any(|l| l == "To: neo@cofre"));
    assert!(out.iter().any(|l| l == "Dojo às 5."));
    assert!(out.iter().any(|l| l == "Não se atrase."));
}

#[tokio::test]
async fn ler_rejects_out_of_bounds_and_garbage_indices() {
    let (_fx, mut kernel) = kernel_as("neo", "redpill").await;
    let err = kernel.exec_line("ler 2").await.unwrap_err();
    assert_eq!(err, TermError::InvalidMessageIndex);
    let err = kernel.exec_line("ler abacaxi").await.unwrap_err();
    assert_eq!(err, TermError::InvalidMessageIndex);
    let err = kernel.exec_line("ler").await.unwrap_err();
    assert_eq!(err, TermError::InvalidMessageIndex);
}

#[tokio::test]
async fn indices_are_recomputed_for_each_user() {
    let (_fx, mut kernel) = kernel_as("neo", "redpill").await;
    let neo_view = lines(kernel.exec_line("caixa").await.unwrap());
    assert_eq!(neo_view, vec!["[0] Acorde", "[1] Treino"]);

    // Same server, different identity, different filtered view.
    kernel.exec_line("login trinity").await.unwrap();
    let trinity_view = lines(kernel.exec_line("caixa").await.unwrap());
    assert_eq!(trinity_view, vec!["[0] Proposta", "[1] Treino"]);

    let out = lines(kernel.exec_line("ler 0").await.unwrap());
    assert!(out.iter().any(|l| l == "From: smith"));
    assert!(out.iter().any(|l| l == "To: trinity@cofre"));
}
