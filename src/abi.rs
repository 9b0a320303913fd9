#[allow(clippy::too_many_arguments)]
pub mod erc20 {
    alloy::sol!(
        /// ERC-20 margin asset with the IERC6093 custom errors.
        #[derive(Debug)]
        #[sol(rpc)]
        interface IERC20 {
            function allowance(address owner, address spender) external view returns (uint256);
            function approve(address spender, uint256 value) external returns (bool);
            function balanceOf(address account) external view returns (uint256);

            error ERC20InsufficientBalance(address sender, uint256 balance, uint256 needed);
            error ERC20InvalidSender(address sender);
            error ERC20InvalidReceiver(address receiver);
            error ERC20InsufficientAllowance(address spender, uint256 allowance, uint256 needed);
            error ERC20InvalidApprover(address approver);
            error ERC20InvalidSpender(address spender);
        }
    );

    impl IERC20::IERC20Errors {
        pub fn name(&self) -> &'static str {
            match self {
                Self::ERC20InsufficientBalance(_) => "ERC20InsufficientBalance",
                Self::ERC20InvalidSender(_) => "ERC20InvalidSender",
                Self::ERC20InvalidReceiver(_) => "ERC20InvalidReceiver",
                Self::ERC20InsufficientAllowance(_) => "ERC20InsufficientAllowance",
                Self::ERC20InvalidApprover(_) => "ERC20InvalidApprover",
                Self::ERC20InvalidSpender(_) => "ERC20InvalidSpender",
            }
        }

        pub fn describe(&self) -> String {
            match self {
                Self::ERC20InsufficientBalance(e) => format!(
                    "balance of {} is {}, needed {}",
                    e.sender, e.balance, e.needed
                ),
                Self::ERC20InsufficientAllowance(e) => format!(
                    "allowance of {} is {}, needed {}",
                    e.spender, e.allowance, e.needed
                ),
                Self::ERC20InvalidSender(e) => format!("invalid sender {}", e.sender),
                Self::ERC20InvalidReceiver(e) => format!("invalid receiver {}", e.receiver),
                Self::ERC20InvalidApprover(e) => format!("invalid approver {}", e.approver),
                Self::ERC20InvalidSpender(e) => format!("invalid spender {}", e.spender),
            }
        }
    }
}

pub mod vault {
    alloy::sol!(
        /// Exchange margin vault.
        #[derive(Debug)]
        #[sol(rpc)]
        interface IMarginVault {
            function deposit(address asset, uint256 amount, uint256 subAccountId) external;
        }
    );
}
