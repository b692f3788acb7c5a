use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};

/// Prefix of endpoints that answer with a JSON document.
pub const JSON_API: &str = "api.json";

/// Prefix of endpoints that answer with a framed notification stream.
pub const TEXT_API: &str = "api.txt";

/// What a command acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    None,
    Machine,
    Deploy,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::None => "none",
            Target::Machine => "machine",
            Target::Deploy => "deploy",
        }
    }
}

/// Lifecycle actions on a deployed app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppAction {
    Start,
    Stop,
    Restart,
}

impl AppAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AppAction::Start => "start",
            AppAction::Stop => "stop",
            AppAction::Restart => "restart",
        }
    }
}

/// How the backend encodes its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// A single JSON document.
    Json,
    /// A framed notification stream, see `mmwire_frame`.
    Text,
}

/// Every backend action the dashboard can trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Command {
    SshKeyGen,
    SshKeyUpdates,
    MachinePrepare { machine: String },
    SshHostkeyUpdate { machine: String },
    SshKeyUpdate { machine: String },
    SshKeyCheck { machine: String },
    GitKeysUpdate { machine: String },
    LogServer { machine: String },
    MachineReboot { machine: String },
    UpdateMachineInfo { machine: String },
    App { deploy: String, action: AppAction },
    Deploy { deploy: String },
    DeployRemove { deploy: String },
    Backup { deploy: String },
    GetLivelist { deploy: String },
}

/// Command names without arguments, for parsing and listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    SshKeyGen,
    SshKeyUpdates,
    MachinePrepare,
    SshHostkeyUpdate,
    SshKeyUpdate,
    SshKeyCheck,
    GitKeysUpdate,
    LogServer,
    MachineReboot,
    UpdateMachineInfo,
    AppStart,
    AppStop,
    AppRestart,
    Deploy,
    DeployRemove,
    Backup,
    GetLivelist,
}

impl CommandKind {
    pub const ALL: [CommandKind; 17] = [
        CommandKind::SshKeyGen,
        CommandKind::SshKeyUpdates,
        CommandKind::MachinePrepare,
        CommandKind::SshHostkeyUpdate,
        CommandKind::SshKeyUpdate,
        CommandKind::SshKeyCheck,
        CommandKind::GitKeysUpdate,
        CommandKind::LogServer,
        CommandKind::MachineReboot,
        CommandKind::UpdateMachineInfo,
        CommandKind::AppStart,
        CommandKind::AppStop,
        CommandKind::AppRestart,
        CommandKind::Deploy,
        CommandKind::DeployRemove,
        CommandKind::Backup,
        CommandKind::GetLivelist,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::SshKeyGen => "ssh-key-gen",
            CommandKind::SshKeyUpdates => "ssh-key-updates",
            CommandKind::MachinePrepare => "machine-prepare",
            CommandKind::SshHostkeyUpdate => "ssh-hostkey-update",
            CommandKind::SshKeyUpdate => "ssh-key-update",
            CommandKind::SshKeyCheck => "ssh-key-check",
            CommandKind::GitKeysUpdate => "git-keys-update",
            CommandKind::LogServer => "log-server",
            CommandKind::MachineReboot => "machine-reboot",
            CommandKind::UpdateMachineInfo => "update-machine-info",
            CommandKind::AppStart => "app-start",
            CommandKind::AppStop => "app-stop",
            CommandKind::AppRestart => "app-restart",
            CommandKind::Deploy => "deploy",
            CommandKind::DeployRemove => "deploy-remove",
            CommandKind::Backup => "backup",
            CommandKind::GetLivelist => "get-livelist",
        }
    }

    pub fn target(self) -> Target {
        match self {
            CommandKind::SshKeyGen | CommandKind::SshKeyUpdates => Target::None,
            CommandKind::MachinePrepare
            | CommandKind::SshHostkeyUpdate
            | CommandKind::SshKeyUpdate
            | CommandKind::SshKeyCheck
            | CommandKind::GitKeysUpdate
            | CommandKind::LogServer
            | CommandKind::MachineReboot
            | CommandKind::UpdateMachineInfo => Target::Machine,
            CommandKind::AppStart
            | CommandKind::AppStop
            | CommandKind::AppRestart
            | CommandKind::Deploy
            | CommandKind::DeployRemove
            | CommandKind::Backup
            | CommandKind::GetLivelist => Target::Deploy,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandKind {
    type Err = ApiError;

    fn from_str(name: &str) -> Result<Self> {
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ApiError::UnknownCommand(name.to_string()))
    }
}

/// A fully resolved backend request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    /// Absolute, percent-encoded URL path.
    pub path: String,
    /// Positional arguments uploaded with the request.
    pub args: Vec<Value>,
    pub format: ResponseFormat,
}

impl Request {
    fn new(segments: &[&str], args: Vec<Value>) -> Self {
        let format = if segments.first() == Some(&TEXT_API) {
            ResponseFormat::Text
        } else {
            ResponseFormat::Json
        };
        let mut path = String::new();
        for segment in segments {
            path.push('/');
            path.push_str(&encode_segment(segment));
        }
        Self { path, args, format }
    }

    /// JSON request body: the positional arguments as an array.
    pub fn body(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.args)?)
    }

    pub fn is_streamed(&self) -> bool {
        self.format == ResponseFormat::Text
    }
}

impl Command {
    /// Build a command from its kind and optional target name.
    pub fn new(kind: CommandKind, target: Option<&str>) -> Result<Self> {
        let target_kind = kind.target();
        let name = match (target_kind, target) {
            (Target::None, None) => String::new(),
            (Target::None, Some(_)) => return Err(ApiError::UnexpectedTarget(kind.name())),
            (_, Some(name)) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(ApiError::MissingTarget {
                    command: kind.name(),
                    target: target_kind.as_str(),
                })
            }
        };

        Ok(match kind {
            CommandKind::SshKeyGen => Command::SshKeyGen,
            CommandKind::SshKeyUpdates => Command::SshKeyUpdates,
            CommandKind::MachinePrepare => Command::MachinePrepare { machine: name },
            CommandKind::SshHostkeyUpdate => Command::SshHostkeyUpdate { machine: name },
            CommandKind::SshKeyUpdate => Command::SshKeyUpdate { machine: name },
            CommandKind::SshKeyCheck => Command::SshKeyCheck { machine: name },
            CommandKind::GitKeysUpdate => Command::GitKeysUpdate { machine: name },
            CommandKind::LogServer => Command::LogServer { machine: name },
            CommandKind::MachineReboot => Command::MachineReboot { machine: name },
            CommandKind::UpdateMachineInfo => Command::UpdateMachineInfo { machine: name },
            CommandKind::AppStart => Command::App {
                deploy: name,
                action: AppAction::Start,
            },
            CommandKind::AppStop => Command::App {
                deploy: name,
                action: AppAction::Stop,
            },
            CommandKind::AppRestart => Command::App {
                deploy: name,
                action: AppAction::Restart,
            },
            CommandKind::Deploy => Command::Deploy { deploy: name },
            CommandKind::DeployRemove => Command::DeployRemove { deploy: name },
            CommandKind::Backup => Command::Backup { deploy: name },
            CommandKind::GetLivelist => Command::GetLivelist { deploy: name },
        })
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::SshKeyGen => CommandKind::SshKeyGen,
            Command::SshKeyUpdates => CommandKind::SshKeyUpdates,
            Command::MachinePrepare { .. } => CommandKind::MachinePrepare,
            Command::SshHostkeyUpdate { .. } => CommandKind::SshHostkeyUpdate,
            Command::SshKeyUpdate { .. } => CommandKind::SshKeyUpdate,
            Command::SshKeyCheck { .. } => CommandKind::SshKeyCheck,
            Command::GitKeysUpdate { .. } => CommandKind::GitKeysUpdate,
            Command::LogServer { .. } => CommandKind::LogServer,
            Command::MachineReboot { .. } => CommandKind::MachineReboot,
            Command::UpdateMachineInfo { .. } => CommandKind::UpdateMachineInfo,
            Command::App { action, .. } => match action {
                AppAction::Start => CommandKind::AppStart,
                AppAction::Stop => CommandKind::AppStop,
                AppAction::Restart => CommandKind::AppRestart,
            },
            Command::Deploy { .. } => CommandKind::Deploy,
            Command::DeployRemove { .. } => CommandKind::DeployRemove,
            Command::Backup { .. } => CommandKind::Backup,
            Command::GetLivelist { .. } => CommandKind::GetLivelist,
        }
    }

    /// The machine or deploy name this command acts on.
    pub fn target_name(&self) -> Option<&str> {
        match self {
            Command::SshKeyGen | Command::SshKeyUpdates => None,
            Command::MachinePrepare { machine }
            | Command::SshHostkeyUpdate { machine }
            | Command::SshKeyUpdate { machine }
            | Command::SshKeyCheck { machine }
            | Command::GitKeysUpdate { machine }
            | Command::LogServer { machine }
            | Command::MachineReboot { machine }
            | Command::UpdateMachineInfo { machine } => Some(machine),
            Command::App { deploy, .. }
            | Command::Deploy { deploy }
            | Command::DeployRemove { deploy }
            | Command::Backup { deploy }
            | Command::GetLivelist { deploy } => Some(deploy),
        }
    }

    /// Prompt to show before running a destructive command.
    pub fn confirmation(&self) -> Option<&'static str> {
        match self {
            Command::MachineReboot { .. } => {
                Some("Are you sure you want to reboot the machine?")
            }
            _ => None,
        }
    }

    pub fn is_streamed(&self) -> bool {
        matches!(self, Command::UpdateMachineInfo { .. })
    }

    /// Resolve the request path and uploaded arguments.
    pub fn request(&self) -> Result<Request> {
        let kind = self.kind();
        if let Some(name) = self.target_name() {
            if name.is_empty() {
                return Err(ApiError::MissingTarget {
                    command: kind.name(),
                    target: kind.target().as_str(),
                });
            }
        }

        let request = match self {
            Command::SshKeyGen => Request::new(&[JSON_API, "ssh-key-gen"], Vec::new()),
            Command::SshKeyUpdates => Request::new(&[JSON_API, "ssh-key-update"], Vec::new()),
            Command::MachinePrepare { machine }
            | Command::SshHostkeyUpdate { machine }
            | Command::SshKeyUpdate { machine }
            | Command::SshKeyCheck { machine }
            | Command::GitKeysUpdate { machine }
            | Command::LogServer { machine }
            | Command::MachineReboot { machine } => {
                Request::new(&[JSON_API, kind.name()], vec![Value::from(machine.as_str())])
            }
            Command::UpdateMachineInfo { machine } => Request::new(
                &[TEXT_API, kind.name()],
                vec![Value::from(machine.as_str())],
            ),
            Command::App { deploy, action } => {
                Request::new(&[JSON_API, "app", deploy.as_str(), action.as_str()], Vec::new())
            }
            Command::Deploy { deploy }
            | Command::DeployRemove { deploy }
            | Command::Backup { deploy } => {
                Request::new(&[JSON_API, kind.name(), deploy.as_str()], Vec::new())
            }
            Command::GetLivelist { deploy } => {
                Request::new(&[kind.name(), deploy.as_str()], Vec::new())
            }
        };
        Ok(request)
    }
}

/// Percent-encode one path segment, leaving RFC 3986 unreserved bytes as is.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(kind: CommandKind, target: Option<&str>) -> Request {
        Command::new(kind, target).unwrap().request().unwrap()
    }

    #[test]
    fn machine_commands_upload_machine_name() {
        let req = request(CommandKind::MachinePrepare, Some("m1"));
        assert_eq!(req.path, "/api.json/machine-prepare");
        assert_eq!(req.args, vec![json!("m1")]);
        assert_eq!(req.format, ResponseFormat::Json);

        let req = request(CommandKind::SshHostkeyUpdate, Some("m1"));
        assert_eq!(req.path, "/api.json/ssh-hostkey-update");
        let req = request(CommandKind::GitKeysUpdate, Some("m1"));
        assert_eq!(req.path, "/api.json/git-keys-update");
        let req = request(CommandKind::MachineReboot, Some("m1"));
        assert_eq!(req.path, "/api.json/machine-reboot");
    }

    #[test]
    fn update_machine_info_is_streamed() {
        let req = request(CommandKind::UpdateMachineInfo, Some("db1"));
        assert_eq!(req.path, "/api.txt/update-machine-info");
        assert_eq!(req.format, ResponseFormat::Text);
        assert!(req.is_streamed());
        assert_eq!(req.body().unwrap(), br#"["db1"]"#);
    }

    #[test]
    fn deploy_commands_put_deploy_in_path() {
        assert_eq!(
            request(CommandKind::AppRestart, Some("web")).path,
            "/api.json/app/web/restart"
        );
        assert_eq!(
            request(CommandKind::Deploy, Some("web")).path,
            "/api.json/deploy/web"
        );
        assert_eq!(
            request(CommandKind::DeployRemove, Some("web")).path,
            "/api.json/deploy-remove/web"
        );
        assert_eq!(
            request(CommandKind::Backup, Some("web")).path,
            "/api.json/backup/web"
        );
        assert_eq!(
            request(CommandKind::GetLivelist, Some("web")).path,
            "/get-livelist/web"
        );
    }

    #[test]
    fn global_ssh_commands() {
        assert_eq!(request(CommandKind::SshKeyGen, None).path, "/api.json/ssh-key-gen");
        let req = request(CommandKind::SshKeyUpdates, None);
        assert_eq!(req.path, "/api.json/ssh-key-update");
        assert!(req.args.is_empty());
    }

    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(
            request(CommandKind::Deploy, Some("a/b c%")).path,
            "/api.json/deploy/a%2Fb%20c%25"
        );
    }

    #[test]
    fn target_validation() {
        let err = Command::new(CommandKind::MachinePrepare, None).unwrap_err();
        assert!(matches!(
            err,
            ApiError::MissingTarget {
                command: "machine-prepare",
                target: "machine"
            }
        ));

        let err = Command::new(CommandKind::Backup, Some("")).unwrap_err();
        assert!(matches!(err, ApiError::MissingTarget { target: "deploy", .. }));

        let err = Command::new(CommandKind::SshKeyGen, Some("m1")).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedTarget("ssh-key-gen")));

        let hand_built = Command::LogServer {
            machine: String::new(),
        };
        assert!(hand_built.request().is_err());
    }

    #[test]
    fn kinds_roundtrip_through_names() {
        for kind in CommandKind::ALL {
            assert_eq!(kind.name().parse::<CommandKind>().unwrap(), kind);
            let target = match kind.target() {
                Target::None => None,
                _ => Some("x"),
            };
            assert_eq!(Command::new(kind, target).unwrap().kind(), kind);
        }
        assert!(matches!(
            "reboot-everything".parse::<CommandKind>(),
            Err(ApiError::UnknownCommand(_))
        ));
    }

    #[test]
    fn only_reboot_asks_for_confirmation() {
        for kind in CommandKind::ALL {
            let target = (kind.target() != Target::None).then_some("x");
            let command = Command::new(kind, target).unwrap();
            assert_eq!(
                command.confirmation().is_some(),
                kind == CommandKind::MachineReboot
            );
        }
    }

    #[test]
    fn serializes_with_command_tag() {
        let command = Command::App {
            deploy: "web".into(),
            action: AppAction::Stop,
        };
        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(
            value,
            json!({"command": "app", "deploy": "web", "action": "stop"})
        );
        let back: Command = serde_json::from_value(value).unwrap();
        assert_eq!(back, command);
    }
}
