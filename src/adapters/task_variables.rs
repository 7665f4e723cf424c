use crate::domain::model::ConfigValue;
use crate::domain::ports::VariableSink;
use crate::utils::error::Result;
use std::io::Write;

pub const PLUGIN_PATHS_KEY: &str = "NUGET_PLUGIN_PATHS";

/// Exposes configuration values to later pipeline steps through agent logging commands.
pub struct TaskVariableWriter<W: Write> {
    out: W,
}

impl<W: Write> TaskVariableWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write(&mut self, value: &ConfigValue) -> Result<()> {
        if value.is_secret {
            // 先註冊成 secret 讓 agent 遮蔽日誌，變數本身仍需進入環境變數
            writeln!(self.out, "##vso[task.setsecret]{}", escape_data(&value.value))?;
        }
        writeln!(
            self.out,
            "##vso[task.setvariable variable={};issecret=false]{}",
            escape_property(value.name),
            escape_data(&value.value)
        )?;
        tracing::debug!("Set variable {}", value.name);
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// 每個值寫完就 flush，後續失敗時已送出的設定仍然有效
impl<W: Write> VariableSink for TaskVariableWriter<W> {
    fn set(&mut self, value: &ConfigValue) -> Result<()> {
        self.write(value)?;
        self.out.flush()?;
        Ok(())
    }
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%AZP25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(']', "%5D").replace(';', "%3B")
}
