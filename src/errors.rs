use thiserror::Error;

/// The closed set of functional failures a command can surface to the player.
///
/// Every variant renders as a single localized message. These are expected,
/// recoverable outcomes: the dispatcher converts them into display text and
/// the session keeps going. Nothing else is allowed to cross the dispatcher
/// boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TermError {
    /// The typed name matched neither a visible software nor a builtin.
    #[error("{0}: Comando não achado.")]
    CommandNotFound(String),

    /// Arguments did not fit the command's syntax.
    #[error("Parâmetros inválidos passados para o comando {0}")]
    InvalidParameters(String),

    /// The address had no reachable manifest. Also covers fetch failures:
    /// the game cannot tell "missing" from "network error" and does not try.
    #[error("Erro : endereço {0} não foi encontrado.")]
    AddressNotFound(String),

    /// A command that needs an address got none.
    #[error("Erro: você tem que especificar um endereço!")]
    AddressEmpty,

    /// Login/connect credentials with an empty user part.
    #[error("Erro: Nome de usuário vazio.")]
    UsernameEmpty,

    /// Credentials with more than one `:` separator.
    #[error("Erro: sintaxe de credenciais errada: use só um usuário, ou usuário:senha.")]
    InvalidCredentialSyntax,

    /// The user exists but the password does not match.
    #[error("Senha inválida para o usuário {0}.")]
    InvalidPassword(String),

    /// No message in the mailbox is addressed to the current user.
    #[error("Nenhuma mensagem registrada.")]
    MailboxEmpty,

    /// `ler` index outside the filtered mailbox, or not a number at all.
    #[error("Número de mensagem inválida.")]
    InvalidMessageIndex,

    /// `conectar` aimed at the server the session is already on.
    #[error("Você já está conectado à {0}")]
    AlreadyConnected(String),

    /// The user id is not in the connected server's directory.
    #[error("Usuário {0} desconhecido.")]
    UnknownUser(String),

    /// The server has no default user, so anonymous access is not possible.
    #[error("Endereço precisa de um usuário para ser acessado; use conectar usuário@{0}")]
    ServerRequiresUsername(String),

    /// Startup data (the software registry) could not be loaded or parsed.
    #[error("{0}")]
    RemoteFetchFailed(String),
}
