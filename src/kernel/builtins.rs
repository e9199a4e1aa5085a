//! The builtin ("native") command set.
//!
//! Handlers return a [`Step`]: either a finished [`Reply`] or an
//! interactive-prompt suspension. All player-facing text is game content
//! and passes through the renderer untouched.

use chrono::{Local, Timelike};
use serde_json::Value;

use crate::errors::TermError;
use crate::kernel::lifecycle::split_credentials;
use crate::kernel::output::Reply;
use crate::kernel::prompt::Step;
use crate::kernel::registry::{Builtin, RegistryEntry};
use crate::kernel::Kernel;

const MAIL_RULE: &str = "---------------------------------------------";

impl Kernel {
    pub(crate) async fn run_builtin(
        &mut self,
        builtin: Builtin,
        args: &[String],
    ) -> Result<Step, TermError> {
        match builtin {
            Builtin::Dumpdb => self.dumpdb(),
            Builtin::QuemSouEu => self.whoami(),
            Builtin::Limpar => Step::done(self.header_reply(None)),
            Builtin::Data => self.show_date(),
            Builtin::Intro => Step::done(Reply::of(intro_lines())),
            Builtin::Ajuda => self.help(args),
            Builtin::Login => {
                let creds = args.first().ok_or(TermError::UsernameEmpty)?.clone();
                let reply = self.login(&creds).await?;
                Step::done(reply)
            }
            Builtin::Logout | Builtin::Sair => {
                let reply = self.logout().await?;
                Step::done(reply)
            }
            Builtin::Caixa => self.list_mailbox(),
            Builtin::Ler => self.read_mail(args),
            Builtin::Ping => self.ping(args).await,
            Builtin::Conectar => self.connect_command(args).await,
        }
    }

    /// Diagnostic dump of the loaded world records. Hidden from `ajuda`.
    fn dumpdb(&self) -> Result<Step, TermError> {
        let mut lines = Vec::new();
        lines.push(":: server - connected server information".to_string());
        dump_record(&mut lines, self.session.current_server());
        lines.push("----------".to_string());
        lines.push(":: user - connected user information".to_string());
        dump_record(&mut lines, self.session.current_user());
        lines.push("----------".to_string());
        lines.push(":: users - list of users registered in the connected server".to_string());
        for (index, user) in self.session.user_directory().iter().enumerate() {
            let value = serde_json::to_value(user).unwrap_or(Value::Null);
            lines.push(format!("{index}: {value}"));
        }
        Step::done(Reply::of(lines))
    }

    fn whoami(&self) -> Result<Step, TermError> {
        let user = self.session.user_id().unwrap_or("-");
        Step::done(Reply::of(format!("{}/{user}", self.operator)))
    }

    /// In-game date: manifest overrides win over the local clock.
    fn show_date(&self) -> Result<Step, TermError> {
        let date = self.server_date();
        let now = Local::now();
        let time = format!("{}:{}:{}", now.hour(), now.minute(), now.second());
        Step::done(Reply::of(format!(
            "{} {} {} {} {}",
            date.month, date.day, date.year, time, date.reference
        )))
    }

    fn help(&self, args: &[String]) -> Result<Step, TermError> {
        match args.first() {
            None => self.help_listing(),
            Some(name) => Step::done(Reply::of(self.help_for(name))),
        }
    }

    fn help_listing(&self) -> Result<Step, TermError> {
        let mut names: Vec<String> = Vec::new();
        for builtin in Builtin::ALL {
            if builtin.hidden() {
                continue;
            }
            // A registry entry can shadow a builtin: disabled names drop out
            // of the listing, secret overlays hide it.
            match self.softwares.resolve(builtin.name(), &self.session) {
                RegistryEntry::Disabled => continue,
                RegistryEntry::Custom(descriptor) if descriptor.secret => continue,
                _ => names.push(builtin.name().to_string()),
            }
        }
        for name in self.softwares.visible_names(&self.session) {
            names.push(name.to_string());
        }
        names.sort();
        names.dedup();
        Step::done(Reply::of(vec![
            "Quer ajuda? Já está melhor do que a maioria dos runners. Digite ajuda seguido \
             de um comando para saber mais."
                .to_string(),
            "De todo jeito, aqui estão os comandos que você tem acesso atualmente:".to_string(),
            format!("<div class=\"ls-files\">{}</div>", names.join("<br>")),
        ]))
    }

    fn help_for(&self, name: &str) -> Vec<String> {
        if let Some(lines) = builtin_help(name) {
            return lines;
        }
        if let RegistryEntry::Custom(descriptor) = self.softwares.resolve(name, &self.session) {
            if let Some(help) = &descriptor.help {
                return vec!["Usage:".to_string(), format!("> {name}"), help.clone()];
            }
        }
        vec![format!(
            "Comando desconhecido {name}; certeza que digitou o comando certo?"
        )]
    }

    /// List the messages addressed to the current user. The printed indices
    /// are positions in this filtered view and feed `ler` directly.
    fn list_mailbox(&self) -> Result<Step, TermError> {
        let listing: Vec<String> = self
            .session
            .visible_mail()
            .iter()
            .enumerate()
            .map(|(index, mail)| format!("[{index}] {}", mail.title))
            .collect();
        if listing.is_empty() {
            return Err(TermError::MailboxEmpty);
        }
        Step::done(Reply::of(listing))
    }

    fn read_mail(&self, args: &[String]) -> Result<Step, TermError> {
        let index: usize = args
            .first()
            .and_then(|arg| arg.parse().ok())
            .ok_or(TermError::InvalidMessageIndex)?;
        let visible = self.session.visible_mail();
        let mail = visible.get(index).ok_or(TermError::InvalidMessageIndex)?;
        let user = self.session.user_id().unwrap_or("-");
        let terminal = self
            .session
            .current_server()
            .map(|server| server.terminal_id.as_str())
            .unwrap_or("-");
        let mut lines = vec![
            MAIL_RULE.to_string(),
            format!("From: {}", mail.from),
            format!("To: {user}@{terminal}"),
            MAIL_RULE.to_string(),
        ];
        lines.extend(mail.paragraphs());
        Step::done(Reply::of(lines))
    }

    async fn ping(&self, args: &[String]) -> Result<Step, TermError> {
        let address = args.first().ok_or(TermError::AddressEmpty)?;
        let record = self.network.manifest(address).await?;
        Step::done(Reply::of(format!(
            "Server {} ({}) can be reached",
            record.address, record.name
        )))
    }

    /// `conectar [user[:pass]@]address`
    async fn connect_command(&mut self, args: &[String]) -> Result<Step, TermError> {
        let target = args.first().ok_or(TermError::AddressEmpty)?.clone();
        let (username, password, address) = if target.contains('@') {
            let mut parts = target.split('@');
            let creds = parts.next().unwrap_or_default().to_string();
            let address = parts.next().unwrap_or_default().to_string();
            if parts.next().is_some() {
                return Err(TermError::InvalidParameters("conectar".to_string()));
            }
            let (user, pass) = split_credentials(&creds)?;
            let user = (!user.is_empty()).then_some(user);
            (user, pass, address)
        } else {
            (None, String::new(), target)
        };
        let reply = self
            .connect_to_server(&address, username.as_deref(), &password)
            .await?;
        Step::done(reply)
    }
}

fn dump_record<T: serde::Serialize>(lines: &mut Vec<String>, record: Option<&T>) {
    let Some(record) = record else {
        lines.push("(nada carregado)".to_string());
        return;
    };
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => {
            for (key, value) in map {
                lines.push(format!("{key}: {value}"));
            }
        }
        Ok(value) => lines.push(value.to_string()),
        Err(_) => lines.push("(registro inválido)".to_string()),
    }
}

fn intro_lines() -> Vec<String> {
    [
        "Eu não te conheço, nem você me conhece. Que permaneça assim.",
        "Esse dispositivo e a rede a qual ele conecta existem porque informação é poder, e \
         há muito tempo tem informação demais nas mãos das pessoas erradas. As ruas sussurram, \
         as corporações escutam, e o Grande Dragão segura o que resta da Pátria pelos ovos.",
        "Se você quer continuar sendo runner, você precisa de lugares onde até ele não chega. \
         Como a minha conexão.",
        "Não sei quem te entregou esse terminal. Talvez um amigo, ou um contato, ou alguém que \
         você não deva confiar. Não me importa. Eu apenas forneço as ferramentas. Como você \
         usa, é com você.",
        "Se você não sabe o que fazer, use o comando ajuda. Ou então dá uma olhada na caixa. \
         Vai que quem te mandou isso aqui teve a decência de deixar uma mensagem primeiro.",
        "Ut supra, ut infra.",
        "— Anhangá",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn builtin_help(name: &str) -> Option<Vec<String>> {
    let lines: &[&str] = match name {
        "limpar" => &["Limpa o terminal. Não seu passado, infelizmente."],
        "data" => &["Mostra a data. Não sei o que você esperava."],
        "ajuda" => &["Você sabe o que isso aqui faz."],
        "login" => &[
            "Logga você em sua conta; use usuário:senha. Se não tem credenciais ainda, \
             provavelmente vai receber se voltar vivo do seu primeiro trabalho. Um grande se.",
        ],
        "caixa" => &[
            "Sua caixa de mensagens; lida com o comando ler. Cheque sempre. Exceto se você \
             gosta de perder dinheiro e viver em baixo de uma pedra.",
            "Não sou sua babá.",
        ],
        "ping" => &[
            "Checa se um endereço existe; digite ping endereço. Se teve uma resposta, \
             parabéns, alguém tá ouvindo. Se não... Bem, ou você foi enganado, ou você é o \
             próximo.",
        ],
        "ler" => &[
            "Lê uma mensagem da sua caixa. Escreva ler e o número à esquerda da mensagem pra \
             a abrir; como 'ler 0', ou 'ler 1'. Pode ser um trabalho. Ou uma ameaça de morte. \
             Não fazemos pré-checagem.",
        ],
        "conectar" => &[
            "Use conectar [endereço] para se conectar para o endereço que seja que seu \
             contato tenha lhe passado. Se você recebeu um login, talvez até uma senha, use \
             conectar usuario@endereço ou conectar usuario:senha@endereço.",
            "Tenha certeza que tá conectando para o lugar certo. O lugar errado talvez \
             conecte de volta.",
        ],
        "quemsoueu" => &[
            "Mostra sua conexão e login atual. Se é sua primeira aqui, provavelmente está em \
             acesso anônimo. Talvez isso mude.",
        ],
        "sair" => &[
            "Disconecta você do server atual. Te traz de volta pra mim. Espero que achou o \
             que procurava.",
        ],
        "logout" => &["Te desloga da conta atual. Às vezes, desaparecer é a melhor opção."],
        _ => return None,
    };
    Some(lines.iter().map(|s| s.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_help_covers_the_public_command_set() {
        for builtin in Builtin::ALL {
            if builtin.hidden() || matches!(builtin, Builtin::Intro) {
                continue;
            }
            assert!(
                builtin_help(builtin.name()).is_some(),
                "missing help for {}",
                builtin.name()
            );
        }
        assert!(builtin_help("dumpdb").is_none());
    }

    #[test]
    fn intro_ends_with_the_signature() {
        let lines = intro_lines();
        assert_eq!(lines.last().map(String::as_str), Some("— Anhangá"));
    }
}
