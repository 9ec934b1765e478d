use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 環境定義ファイルを置くための一時ディレクトリ
pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn write_config(&self, filename: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// ホームのグローバル設定を拾わないよう HOME / XDG_CONFIG_HOME を差し替えたコマンド
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("stratus").unwrap();
        cmd.current_dir(self.path())
            .env_remove("STRATUS_CONFIG_PATH")
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"));
        cmd
    }
}

pub const STAGING_YAML: &str = r#"
environment: staging
vpc:
  name: staging-vpc
  cidrBlock: 10.0.0.0/16
  subnets:
    - name: public-a
      availabilityZone: us-west-2a
      cidrBlock: 10.0.0.0/24
      networkAclName: public
    - name: public-b
      availabilityZone: us-west-2b
      cidrBlock: 10.0.1.0/24
      networkAclName: public
  networkAcls:
    - name: public
      rules:
        - cidrBlock: 0.0.0.0/0
          egress: false
          protocol: "-1"
          ruleAction: allow
          ruleNumber: 100
securityGroup:
  name: web-sg
  description: web
  vpcName: staging-vpc
launchConfig:
  name: web-lc
  vpcName: staging-vpc
  securityGroupName: web-sg
  imageId: ami-123
  instanceType: t3.small
targetGroup:
  name: web-tg
  vpcName: staging-vpc
  port: 80
  protocol: HTTP
autoScaleGroup:
  name: web-asg
  vpcName: staging-vpc
  vpcSubnets: [public-a, public-b]
  targetGroupName: web-tg
  minSize: 1
  maxSize: 3
  desiredSize: 2
loadBalancer:
  name: web-lb
  vpcName: staging-vpc
  vpcSubnets: [public-a, public-b]
  securityGroupName: web-sg
listener:
  - loadBalancerName: web-lb
    targetGroupName: web-tg
    protocol: HTTP
    port: 80
  - loadBalancerName: web-lb
    targetGroupName: web-tg
    protocol: HTTPS
    port: 443
    certificateArn: arn:aws:acm:us-west-2:123456789012:certificate/abc
"#;
