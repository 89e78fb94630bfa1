//! Solidity ABI bindings shared across modules.
//!
//! Everything that crosses the wire (signed order struct, predicate call
//! fragments, permit payloads) is declared here with `sol!` so the
//! encodings match the EVM ABI byte for byte.

use alloy::sol;

sol! {
    /// EIP-712 order message. Field order is part of the signed format.
    #[derive(Debug, PartialEq, Eq)]
    struct Order {
        uint256 salt;
        address makerAsset;
        address takerAsset;
        address maker;
        address receiver;
        address allowedSender;
        uint256 makingAmount;
        uint256 takingAmount;
        bytes makerAssetData;
        bytes takerAssetData;
        bytes getMakingAmount;
        bytes getTakingAmount;
        bytes predicate;
        bytes permit;
        bytes interaction;
    }
}

sol! {
    /// Permit payload carried inside orders and fill-with-permit calls.
    #[derive(Debug, PartialEq, Eq)]
    struct PermitPayload {
        address owner;
        address spender;
        uint256 value;
        uint256 deadline;
        bytes signature;
    }
}

sol! {
    /// EIP-2612 permit message, signed by the asset owner.
    #[derive(Debug, PartialEq, Eq)]
    struct Permit {
        address owner;
        address spender;
        uint256 value;
        uint256 nonce;
        uint256 deadline;
    }
}

sol! {
    /// Predicate primitives.
    #[derive(Debug, PartialEq, Eq)]
    interface IPredicates {
        function and(uint256 offsets, bytes data) external view returns (bool);
        function or(uint256 offsets, bytes data) external view returns (bool);
        function eq(uint256 value, bytes data) external view returns (bool);
        function lt(uint256 value, bytes data) external view returns (bool);
        function gt(uint256 value, bytes data) external view returns (bool);
        function timestampBelow(uint256 time) external view returns (bool);
        function nonceEquals(address makerAddress, uint256 makerNonce) external view returns (bool);
        function arbitraryStaticCall(address target, bytes data) external view returns (uint256);
    }
}

sol! {
    /// Read-only surface of the protocol itself, reachable from predicates.
    #[derive(Debug, PartialEq, Eq)]
    interface IProtocolViews {
        function nonce(address account) external view returns (uint256);
        function remaining(bytes32 orderHash) external view returns (uint256);
    }
}

sol! {
    /// Default linear amount calculator.
    interface IAmountCalculator {
        function getMakingAmount(uint256 orderMakingAmount, uint256 orderTakingAmount, uint256 swapTakingAmount) external pure returns (uint256);
        function getTakingAmount(uint256 orderMakingAmount, uint256 orderTakingAmount, uint256 swapMakingAmount) external pure returns (uint256);
    }
}

sol! {
    /// Fungible token reads used by balance predicates.
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
    }
}
