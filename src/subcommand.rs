use anyhow::{anyhow, Result};
use clap::{Args, Subcommand as ClapSubcommand};
use opnet_kv::MemoryEnvironment;
use satforge::{
    abi::{self, Op20Call},
    config::DeployConfig,
    logging, Address, Amount, Op20Event, SatForgeToken, TxContext,
};
use satforge_support::{event::Event, selector::Selector};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(ClapSubcommand, Debug, Clone)]
pub enum Subcommand {
    /// Print the 4-byte selector of each method name
    Selector(SelectorArgs),
    /// Deploy a token and print its metadata and the mint event
    Deploy(DeployArgs),
    /// Deploy a token, then run a sequence of calls against it
    Call(CallArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SelectorArgs {
    #[arg(required = true)]
    pub names: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    #[arg(long, help = "JSON deploy config; flags below override its fields")]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub symbol: Option<String>,
    #[arg(long, help = "Max supply in whole tokens, decimal")]
    pub supply: Option<String>,
    #[arg(long)]
    pub decimals: Option<u8>,
    #[arg(long, value_parser = parse_address, help = "Deployer address (hex, or a small integer)")]
    pub deployer: Option<Address>,
}

#[derive(Args, Debug, Clone)]
pub struct CallArgs {
    #[command(flatten)]
    pub deploy: DeployArgs,
    #[arg(
        long = "call",
        required = true,
        help = "[sender@]method[:arg,arg...], e.g. transfer:2,100 or 2@approve:3,50"
    )]
    pub calls: Vec<CallRequest>,
}

impl DeployArgs {
    pub fn resolve(&self) -> Result<DeployConfig> {
        let mut config = match &self.config {
            Some(path) => DeployConfig::load(path)?,
            None => DeployConfig::default(),
        };
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(symbol) = &self.symbol {
            config.symbol = symbol.clone();
        }
        if let Some(supply) = &self.supply {
            config.supply = supply.clone();
        }
        if let Some(decimals) = self.decimals {
            config.decimals = decimals;
        }
        if let Some(deployer) = self.deployer {
            config.deployer = deployer;
        }
        Ok(config)
    }
}

/// Hex addresses as usual; a bare decimal integer becomes the address whose
/// low 8 bytes hold it, which keeps command lines short.
pub fn parse_address(s: &str) -> Result<Address, String> {
    if !s.is_empty() && s.len() <= 20 && s.chars().all(|c| c.is_ascii_digit()) {
        let n: u64 = s.parse().map_err(|e| format!("{}: {}", s, e))?;
        if n == 0 {
            return Ok(Address::ZERO);
        }
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        return Ok(Address::new(bytes));
    }
    s.parse::<Address>().map_err(|e| format!("{}: {}", s, e))
}

fn parse_amount(s: &str) -> Result<Amount, String> {
    s.parse::<Amount>().map_err(|e| format!("amount {}: {}", s, e))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    Op20(Op20Call),
    /// A selector outside the OP_20 table, sent with raw calldata.
    Raw { selector: Selector, calldata: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub sender: Option<Address>,
    pub target: CallTarget,
}

impl FromStr for CallRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sender, rest) = match s.split_once('@') {
            Some((sender, rest)) => (Some(parse_address(sender)?), rest),
            None => (None, s),
        };
        let (method, args) = rest.split_once(':').unwrap_or((rest, ""));
        let args: Vec<&str> = args.split(',').filter(|a| !a.is_empty()).collect();
        let arity = |n: usize| -> Result<(), String> {
            if args.len() == n {
                Ok(())
            } else {
                Err(format!("{} takes {} arguments, got {}", method, n, args.len()))
            }
        };
        let call = match method {
            abi::NAME => arity(0).map(|_| Op20Call::Name)?,
            abi::SYMBOL => arity(0).map(|_| Op20Call::Symbol)?,
            abi::DECIMALS => arity(0).map(|_| Op20Call::Decimals)?,
            abi::TOTAL_SUPPLY => arity(0).map(|_| Op20Call::TotalSupply)?,
            abi::MAXIMUM_SUPPLY => arity(0).map(|_| Op20Call::MaximumSupply)?,
            abi::BALANCE_OF => {
                arity(1)?;
                Op20Call::BalanceOf {
                    owner: parse_address(args[0])?,
                }
            }
            abi::ALLOWANCE => {
                arity(2)?;
                Op20Call::Allowance {
                    owner: parse_address(args[0])?,
                    spender: parse_address(args[1])?,
                }
            }
            abi::TRANSFER => {
                arity(2)?;
                Op20Call::Transfer {
                    recipient: parse_address(args[0])?,
                    amount: parse_amount(args[1])?,
                }
            }
            abi::APPROVE => {
                arity(2)?;
                Op20Call::Approve {
                    spender: parse_address(args[0])?,
                    amount: parse_amount(args[1])?,
                }
            }
            abi::TRANSFER_FROM => {
                arity(3)?;
                Op20Call::TransferFrom {
                    owner: parse_address(args[0])?,
                    recipient: parse_address(args[1])?,
                    amount: parse_amount(args[2])?,
                }
            }
            raw => {
                let hex_selector = raw
                    .strip_prefix("0x")
                    .ok_or_else(|| format!("unknown method {}", raw))?;
                let selector = u32::from_str_radix(hex_selector, 16)
                    .map_err(|e| format!("selector {}: {}", raw, e))?;
                let calldata = match args.as_slice() {
                    [] => Vec::new(),
                    [data] => {
                        let data: &str = data;
                        hex::decode(data.strip_prefix("0x").unwrap_or(data))
                            .map_err(|e| format!("calldata {}: {}", data, e))?
                    }
                    _ => return Err("raw selector calls take at most one hex argument".to_string()),
                };
                return Ok(CallRequest {
                    sender,
                    target: CallTarget::Raw { selector, calldata },
                });
            }
        };
        Ok(CallRequest {
            sender,
            target: CallTarget::Op20(call),
        })
    }
}

impl CallRequest {
    fn selector(&self) -> Selector {
        match &self.target {
            CallTarget::Op20(call) => call.selector(),
            CallTarget::Raw { selector, .. } => *selector,
        }
    }

    fn calldata(&self) -> Vec<u8> {
        match &self.target {
            CallTarget::Op20(call) => call.calldata(),
            CallTarget::Raw { calldata, .. } => calldata.clone(),
        }
    }

    fn label(&self) -> String {
        match &self.target {
            CallTarget::Op20(call) => call.method().to_string(),
            CallTarget::Raw { selector, .. } => format!("0x{:08x}", selector),
        }
    }
}

fn describe_return(target: &CallTarget, data: &[u8]) -> String {
    let call = match target {
        CallTarget::Op20(call) => call,
        CallTarget::Raw { .. } => return String::new(),
    };
    let decoded = match call {
        Op20Call::Name | Op20Call::Symbol => abi::decode_string(data).map(|s| format!("{:?}", s)),
        Op20Call::Decimals => abi::decode_u8(data).map(|d| d.to_string()),
        Op20Call::TotalSupply
        | Op20Call::MaximumSupply
        | Op20Call::BalanceOf { .. }
        | Op20Call::Allowance { .. } => abi::decode_u256(data).map(|v| v.to_string()),
        Op20Call::Transfer { .. } | Op20Call::Approve { .. } | Op20Call::TransferFrom { .. } => {
            abi::decode_bool(data).map(|b| b.to_string())
        }
    };
    decoded.unwrap_or_else(|e| format!("<undecodable: {}>", e))
}

fn print_events(events: &[Event]) {
    for event in events {
        match Op20Event::decode(event) {
            Ok(decoded) => println!("  event {:?}", decoded),
            Err(_) => println!("  event {} 0x{}", event.name, hex::encode(&event.data)),
        }
    }
}

fn deploy(args: &DeployArgs) -> Result<(SatForgeToken<MemoryEnvironment>, DeployConfig)> {
    let config = args.resolve()?;
    let mut token = SatForgeToken::new(MemoryEnvironment::new());
    let ctx = TxContext::new(config.deployer);
    let response = token
        .deploy_with_decimals(&ctx, &config.to_calldata()?, config.decimals)
        .map_err(|e| anyhow!("deployment failed: {}", e))?;
    let metadata = token.metadata()?;
    println!(
        "deployed {} ({}), {} decimals, max supply {}",
        metadata.name, metadata.symbol, metadata.decimals, metadata.max_supply
    );
    println!(
        "deployer {} balance {}",
        config.deployer,
        token.balance_of(&config.deployer)
    );
    print_events(&response.events);
    Ok((token, config))
}

impl Subcommand {
    pub fn run(self) -> Result<()> {
        match self {
            Subcommand::Selector(args) => {
                for name in args.names {
                    println!("{} 0x{:08x}", name, satforge::encode_selector(&name));
                }
                Ok(())
            }
            Subcommand::Deploy(args) => {
                deploy(&args)?;
                Ok(())
            }
            Subcommand::Call(args) => {
                logging::init_call_stats();
                let (mut token, config) = deploy(&args.deploy)?;
                for request in &args.calls {
                    let ctx = TxContext::new(request.sender.unwrap_or(config.deployer));
                    match token.call(&ctx, request.selector(), &request.calldata()) {
                        Ok(response) => {
                            println!(
                                "{} -> 0x{} {}",
                                request.label(),
                                hex::encode(&response.data),
                                describe_return(&request.target, &response.data)
                            );
                            print_events(&response.events);
                        }
                        Err(e) => println!("{} reverted: {}", request.label(), e),
                    }
                }
                if let Some(stats) = logging::take_call_stats() {
                    logging::log_call_summary(&stats);
                }
                Ok(())
            }
        }
    }
}
